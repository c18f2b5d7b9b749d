use crate::models::{Entity, Record};
use tracing::warn;

/// Entities rebuilt from a category's rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assembly {
    pub entities: Vec<Entity>,
    /// Continuation rows seen before the first identity row. They have no
    /// entity to attach to and are discarded.
    pub dropped_leading: usize,
}

/// Fold rows into entities.
///
/// Without an identity field every row is its own entity. With one, a row
/// whose identity cell is non-blank opens a new entity and any other row is
/// appended to the currently open entity as a continuation record. Row order
/// is never changed.
pub fn assemble(records: Vec<Record>, identity: Option<&str>) -> Assembly {
    let Some(identity) = identity else {
        return Assembly {
            entities: records.into_iter().map(Entity::new).collect(),
            dropped_leading: 0,
        };
    };

    let mut entities: Vec<Entity> = Vec::new();
    let mut dropped_leading = 0;

    for record in records {
        let opens_entity = record
            .get(identity)
            .map_or(false, |value| !value.is_blank());

        if opens_entity {
            entities.push(Entity::new(record));
        } else if let Some(open) = entities.last_mut() {
            open.continuation.push(record);
        } else {
            dropped_leading += 1;
        }
    }

    if dropped_leading > 0 {
        warn!(
            dropped = dropped_leading,
            identity, "discarded continuation rows found before the first entity"
        );
    }

    Assembly {
        entities,
        dropped_leading,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, note: &str) -> Record {
        [("name", name), ("note", note)].into_iter().collect()
    }

    #[test]
    fn test_without_identity_each_row_is_an_entity() {
        let assembly = assemble(vec![row("a", "1"), row("", "2")], None);
        assert_eq!(assembly.entities.len(), 2);
        assert!(assembly.entities.iter().all(|e| e.continuation.is_empty()));
        assert_eq!(assembly.entities[1].fields.text("note"), "2");
    }

    #[test]
    fn test_continuation_rows_attach_to_previous_entity() {
        let rows = vec![row("a", "1"), row("", "2"), row(" ", "3"), row("b", "4")];
        let assembly = assemble(rows, Some("name"));

        assert_eq!(assembly.entities.len(), 2);
        assert_eq!(assembly.entities[0].fields.text("name"), "a");
        let notes: Vec<_> = assembly.entities[0]
            .continuation
            .iter()
            .map(|r| r.text("note"))
            .collect();
        assert_eq!(notes, vec!["2", "3"]);
        assert!(assembly.entities[1].continuation.is_empty());
    }

    #[test]
    fn test_missing_identity_field_is_continuation() {
        let orphan: Record = [("note", "x")].into_iter().collect();
        let assembly = assemble(vec![row("a", "1"), orphan], Some("name"));
        assert_eq!(assembly.entities[0].continuation.len(), 1);
    }

    #[test]
    fn test_leading_continuation_rows_are_dropped() {
        let rows = vec![row("", "lost"), row("", "lost too"), row("a", "1")];
        let assembly = assemble(rows, Some("name"));
        assert_eq!(assembly.dropped_leading, 2);
        assert_eq!(assembly.entities.len(), 1);
        assert!(assembly.entities[0].continuation.is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(assemble(Vec::new(), Some("name")), Assembly::default());
    }
}
