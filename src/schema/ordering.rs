//! Deterministic dependency ordering of tables.
//!
//! Kahn's algorithm over the foreign-key graph. Among tables that are ready at
//! the same time the smallest name goes first, so the order only depends on
//! the schema contents. Tables caught in a reference cycle cannot be ordered;
//! they are appended after every orderable table, in name order. Their foreign
//! keys are added in the constraint pass anyway, after all tables exist.

use std::collections::{BTreeMap, BTreeSet};

use super::definition::{Schema, Table};

/// Result of ordering a schema's tables.
#[derive(Debug, Clone)]
pub struct TableOrder<'a> {
    /// Every table exactly once, referenced tables before referencing ones
    pub tables: Vec<&'a Table>,
    /// Names of tables that sit on a foreign-key cycle (or depend on one)
    pub cyclic: Vec<&'a str>,
}

impl Schema {
    /// Tables in dependency order. See [`sort_tables`].
    pub fn sorted_tables(&self) -> Vec<&Table> {
        sort_tables(self).tables
    }
}

/// Order the schema's tables so referenced tables come first.
pub fn sort_tables(schema: &Schema) -> TableOrder<'_> {
    let dependencies = schema.dependencies();

    // referenced table -> tables that reference it
    let mut dependents: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    let mut in_degree: BTreeMap<&str, usize> = BTreeMap::new();

    for (&table, targets) in &dependencies {
        in_degree.insert(table, targets.len());
        for &target in targets {
            dependents.entry(target).or_default().push(table);
        }
    }

    let mut ready: BTreeSet<&str> = in_degree
        .iter()
        .filter(|&(_, &degree)| degree == 0)
        .map(|(&name, _)| name)
        .collect();

    let mut ordered: Vec<&str> = Vec::with_capacity(in_degree.len());

    while let Some(current) = ready.pop_first() {
        ordered.push(current);
        for &dependent in dependents.get(current).into_iter().flatten() {
            if let Some(degree) = in_degree.get_mut(dependent) {
                *degree -= 1;
                if *degree == 0 {
                    ready.insert(dependent);
                }
            }
        }
    }

    let placed: BTreeSet<&str> = ordered.iter().copied().collect();
    let cyclic: Vec<&str> = in_degree
        .keys()
        .copied()
        .filter(|name| !placed.contains(name))
        .collect();

    if !cyclic.is_empty() {
        tracing::warn!(
            tables = ?cyclic,
            "foreign-key cycle detected; these tables are created last in name order"
        );
    }

    let tables = ordered
        .iter()
        .chain(cyclic.iter())
        .filter_map(|name| schema.table(name))
        .collect();

    TableOrder { tables, cyclic }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::definition::{Constraint, ForeignReference};
    use rstest::rstest;

    fn schema_with(edges: &[(&str, &str)], tables: &[&str]) -> Schema {
        let mut schema = Schema::new();
        for name in tables {
            schema.add_table(Table::new(*name)).unwrap();
        }
        for (from, to) in edges {
            let table = schema.table_mut(from).unwrap();
            table.constraints.push(Constraint::foreign_key(
                vec![format!("{}_id", to)],
                ForeignReference {
                    table: to.to_string(),
                    columns: vec!["id".to_string()],
                    on_delete: None,
                    on_update: None,
                },
            ));
        }
        schema
    }

    fn names<'a>(tables: &[&'a Table]) -> Vec<&'a str> {
        tables.iter().map(|t| t.name.as_str()).collect()
    }

    #[rstest]
    fn test_no_relationships_sorted_by_name() {
        let schema = schema_with(&[], &["visit", "person", "care_site"]);
        assert_eq!(names(&schema.sorted_tables()), vec!["care_site", "person", "visit"]);
    }

    #[rstest]
    fn test_order_is_stable_across_runs() {
        let schema = schema_with(&[], &["d", "b", "a", "c", "e"]);
        let first = names(&schema.sorted_tables());
        for _ in 0..10 {
            assert_eq!(names(&schema.sorted_tables()), first);
        }
    }

    #[rstest]
    fn test_referenced_table_first() {
        // "Order" sorts before "Person" by name but depends on it
        let schema = schema_with(&[("Order", "Person")], &["Order", "Person"]);
        assert_eq!(names(&schema.sorted_tables()), vec!["Person", "Order"]);
    }

    #[rstest]
    fn test_chain_and_ties() {
        let schema = schema_with(
            &[("visit", "person"), ("person", "location"), ("note", "visit")],
            &["note", "visit", "person", "location", "concept"],
        );
        assert_eq!(
            names(&schema.sorted_tables()),
            vec!["concept", "location", "person", "visit", "note"]
        );
    }

    #[rstest]
    fn test_self_reference_does_not_block() {
        let schema = schema_with(&[("employee", "employee")], &["employee", "audit"]);
        let order = sort_tables(&schema);
        assert!(order.cyclic.is_empty());
        assert_eq!(names(&order.tables), vec!["audit", "employee"]);
    }

    #[rstest]
    fn test_cycle_appended_in_name_order() {
        let schema = schema_with(
            &[("b", "a"), ("a", "b"), ("c", "b")],
            &["a", "b", "c", "z"],
        );
        let order = sort_tables(&schema);
        assert_eq!(order.cyclic, vec!["a", "b", "c"]);
        assert_eq!(names(&order.tables), vec!["z", "a", "b", "c"]);
    }
}
