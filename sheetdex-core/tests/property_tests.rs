use proptest::prelude::*;
use sheetdex_core::*;

fn cell() -> impl Strategy<Value = String> {
    // Blank, whitespace-only and short mixed-script values
    prop_oneof![
        Just(String::new()),
        Just(" ".to_string()),
        proptest::string::string_regex("[a-cA-Cア-ウ炎水]{1,3}").unwrap(),
    ]
}

fn row() -> impl Strategy<Value = Record> {
    (cell(), cell(), cell()).prop_map(|(name, note, immunity)| {
        [("name", name), ("note", note), ("免", immunity)]
            .into_iter()
            .collect()
    })
}

fn rows() -> impl Strategy<Value = Vec<Record>> {
    proptest::collection::vec(row(), 0..24)
}

fn index_of(entities: &[Entity], entity: &Entity) -> usize {
    entities
        .iter()
        .position(|candidate| std::ptr::eq(candidate, entity))
        .expect("entity comes from the list")
}

proptest! {
    #[test]
    fn assembly_conserves_rows(records in rows()) {
        let total = records.len();
        let assembly = assemble(records, Some("name"));
        let continuation: usize = assembly.entities.iter().map(|e| e.continuation.len()).sum();
        prop_assert_eq!(assembly.entities.len() + continuation + assembly.dropped_leading, total);
    }

    #[test]
    fn assembly_never_reorders(records in rows()) {
        let assembly = assemble(records.clone(), Some("name"));
        let flattened: Vec<Record> = assembly
            .entities
            .iter()
            .flat_map(|e| std::iter::once(e.fields.clone()).chain(e.continuation.iter().cloned()))
            .collect();
        prop_assert_eq!(&flattened[..], &records[assembly.dropped_leading..]);
    }

    #[test]
    fn ungrouped_assembly_is_one_to_one(records in rows()) {
        let total = records.len();
        let assembly = assemble(records, None);
        prop_assert_eq!(assembly.entities.len(), total);
        prop_assert_eq!(assembly.dropped_leading, 0);
    }

    #[test]
    fn search_result_is_ordered_subset(records in rows(), query in cell()) {
        let entities = assemble(records, Some("name")).entities;

        let everything = search(&entities, "");
        prop_assert_eq!(everything.len(), entities.len());

        let found = search(&entities, &query);
        let positions: Vec<usize> = found.iter().map(|e| index_of(&entities, e)).collect();
        prop_assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn groups_partition_the_category(records in rows()) {
        let entities = assemble(records, None).entities;
        let searched = search(&entities, "");
        let groups = classify(&entities, &searched, Some("免"), "all", "unset").unwrap();

        prop_assert_eq!(groups[0].kind, GroupKind::All);
        prop_assert_eq!(groups[0].entities.len(), entities.len());

        let mut seen: Vec<usize> = groups[1..]
            .iter()
            .flat_map(|g| g.entities.iter().map(|e| index_of(&entities, e)))
            .collect();
        seen.sort_unstable();
        let expected: Vec<usize> = (0..entities.len()).collect();
        prop_assert_eq!(seen, expected);

        let labels: Vec<&str> = groups[1..].iter().map(|g| g.label.as_str()).collect();
        let mut sorted = labels.clone();
        sorted.sort();
        prop_assert_eq!(labels, sorted);
    }

    #[test]
    fn name_resolution_is_deterministic(record in row()) {
        let table = CategoryTable::builtin();
        let behavior = table.behavior_for("ST");
        let entity = Entity::new(record);

        let first = display_name(&entity, &behavior, table.config());
        let second = display_name(&entity, &behavior, table.config());
        prop_assert_eq!(&first, &second);
        prop_assert!(!first.trim().is_empty());
    }

    #[test]
    fn compound_header_consumes_only_the_first_row(records in rows()) {
        let table = CategoryTable::builtin();
        let reconciled = reconcile_headers(&records, true, "_", table.placeholder());
        prop_assert_eq!(reconciled.len(), records.len().saturating_sub(1));

        let untouched = reconcile_headers(&records, false, "_", table.placeholder());
        prop_assert_eq!(untouched, records);
    }
}
