//! Registry merger: fold ordered per-directory scans into one table.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::PathBuf;

use polygate_core::Handler;

use super::scanner::PolicyDefinition;

/// Merge scan results in search-path order.
///
/// Index 0 is the earliest (lowest-precedence) directory. A name not yet in
/// the table is inserted unconditionally; a name already present is replaced
/// when `override_mode` is true (later entries win) and kept otherwise (first
/// entry wins, later duplicates silently ignored). The outcome is
/// deterministic for a fixed search path, override mode, and directory
/// contents.
pub fn merge(
    scans: Vec<(PathBuf, Vec<PolicyDefinition>)>,
    override_mode: bool,
) -> HashMap<String, Handler> {
    let mut table: HashMap<String, Handler> = HashMap::new();

    for (dir, definitions) in scans {
        for def in definitions {
            match table.entry(def.name) {
                Entry::Vacant(slot) => {
                    slot.insert(def.handler);
                }
                Entry::Occupied(mut slot) => {
                    if override_mode {
                        tracing::debug!(policy = %slot.key(), dir = %dir.display(), "later definition overrides earlier one");
                        slot.insert(def.handler);
                    } else {
                        tracing::debug!(policy = %slot.key(), dir = %dir.display(), "override disabled, keeping earlier definition");
                    }
                }
            }
        }
    }

    table
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use polygate_core::{Flow, PolicyHandler, RecordingFlow, RequestContext};
    use serde_json::Value;

    /// Handler stamping `marker` into the context so tests can tell which
    /// definition won a merge.
    fn marker_handler(marker: &'static str) -> Handler {
        Arc::new(
            move |_: &Value, ctx: &mut RequestContext, flow: &mut dyn Flow| {
                ctx.set("marker", marker);
                flow.proceed();
            },
        )
    }

    fn definition(name: &str, marker: &'static str) -> PolicyDefinition {
        PolicyDefinition {
            name: name.to_string(),
            handler: marker_handler(marker),
        }
    }

    fn winning_marker(table: &HashMap<String, Handler>, name: &str) -> String {
        let mut ctx = RequestContext::new();
        let mut flow = RecordingFlow::new();
        table
            .get(name)
            .unwrap()
            .invoke(&Value::Null, &mut ctx, &mut flow);
        ctx.get("marker").unwrap().as_str().unwrap().to_string()
    }

    fn two_dir_scans() -> Vec<(PathBuf, Vec<PolicyDefinition>)> {
        vec![
            (
                PathBuf::from("/a"),
                vec![definition("p1", "a")],
            ),
            (
                PathBuf::from("/b"),
                vec![definition("p1", "b"), definition("p2", "c")],
            ),
        ]
    }

    #[test]
    fn disjoint_names_union() {
        let table = merge(
            vec![
                (PathBuf::from("/a"), vec![definition("p1", "a")]),
                (PathBuf::from("/b"), vec![definition("p2", "b")]),
            ],
            true,
        );
        assert_eq!(table.len(), 2);
        assert!(table.contains_key("p1"));
        assert!(table.contains_key("p2"));
    }

    #[test]
    fn override_on_later_wins() {
        let table = merge(two_dir_scans(), true);
        assert_eq!(winning_marker(&table, "p1"), "b");
        assert_eq!(winning_marker(&table, "p2"), "c");
    }

    #[test]
    fn override_off_first_wins() {
        let table = merge(two_dir_scans(), false);
        assert_eq!(winning_marker(&table, "p1"), "a");
        assert_eq!(winning_marker(&table, "p2"), "c");
    }

    #[test]
    fn duplicates_within_one_scan_follow_same_rule() {
        // listing order inside one scan comes from the scanner's sort
        let table = merge(
            vec![(
                PathBuf::from("/a"),
                vec![definition("p1", "first"), definition("p1", "second")],
            )],
            true,
        );
        assert_eq!(winning_marker(&table, "p1"), "second");

        let table = merge(
            vec![(
                PathBuf::from("/a"),
                vec![definition("p1", "first"), definition("p1", "second")],
            )],
            false,
        );
        assert_eq!(winning_marker(&table, "p1"), "first");
    }
}
