//! Structural templates.
//!
//! A [`Template`] describes the shape of a statement: the names it may
//! carry, one type mask per fixed position (the layout) and an optional
//! tail type that admits any number of further values. Templates validate
//! identifiers and values, look them up, rename them, and compact runs of
//! loose values into new identifiers.
//!
//! ## Examples
//!
//! ```rust
//! use duct_script::{parse_str, Collection, Template, VariableType};
//!
//! let mut root = parse_str("x = 1\ny = 2\nlabel = origin").unwrap();
//!
//! let point = Template::new(["x", "y"], [VariableType::INTEGER, VariableType::INTEGER]);
//! assert_eq!(point.compact(&mut root, "point", false), 1);
//!
//! let point = root.get_identifier("point", true).unwrap();
//! assert_eq!(point.len(), 2);
//! assert_eq!(root.len(), 2);
//! ```

use crate::value::{names_match, Collection, Identifier, ValueVariable, Variable, VariableType};
use tracing::debug;

/// A positional name and type pattern.
#[derive(Clone, Debug, PartialEq)]
pub struct Template {
    names: Option<Vec<String>>,
    layout: Vec<VariableType>,
    tail: VariableType,
    case_sensitive: bool,
}

impl Default for Template {
    fn default() -> Self {
        Template {
            names: None,
            layout: Vec::new(),
            tail: VariableType::NONE,
            case_sensitive: false,
        }
    }
}

impl Template {
    /// Creates a template with a name list and a layout.
    ///
    /// An empty name list matches any name.
    pub fn new<N, S, L>(names: N, layout: L) -> Self
    where
        N: IntoIterator<Item = S>,
        S: Into<String>,
        L: IntoIterator<Item = VariableType>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        Template {
            names: (!names.is_empty()).then_some(names),
            layout: layout.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Creates a template that matches any name.
    pub fn from_layout<L>(layout: L) -> Self
    where
        L: IntoIterator<Item = VariableType>,
    {
        Template {
            layout: layout.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Admits any number of values of type `tail` after the layout.
    #[must_use]
    pub fn with_tail(mut self, tail: VariableType) -> Self {
        self.tail = tail;
        self
    }

    #[must_use]
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    #[must_use]
    pub fn names(&self) -> Option<&[String]> {
        self.names.as_deref()
    }

    #[must_use]
    pub fn layout(&self) -> &[VariableType] {
        &self.layout
    }

    #[must_use]
    pub const fn tail(&self) -> VariableType {
        self.tail
    }

    #[must_use]
    pub const fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    fn name_allowed(&self, name: &str) -> bool {
        match &self.names {
            None => true,
            Some(names) => names
                .iter()
                .any(|n| names_match(n, name, self.case_sensitive)),
        }
    }

    /// Checks an identifier against the name list, layout and tail.
    ///
    /// The identifier needs at least one value per layout slot, and more
    /// only if a tail type is set. Slot and tail checks pass when the
    /// value's type shares a bit with the mask.
    #[must_use]
    pub fn validate_identifier(&self, identifier: &Identifier) -> bool {
        let count = identifier.len();
        let fixed = self.layout.len();
        if (count > fixed && self.tail.is_empty()) || count < fixed {
            return false;
        }
        if !self.name_allowed(identifier.name()) {
            return false;
        }
        let (head, rest) = identifier.children().split_at(fixed);
        head.iter()
            .zip(&self.layout)
            .all(|(child, slot)| slot.intersects(child.variable_type()))
            && rest
                .iter()
                .all(|child| self.tail.intersects(child.variable_type()))
    }

    /// Checks a named value against the name list and the first layout
    /// slot, or the tail when the layout is empty.
    #[must_use]
    pub fn validate_value(&self, value: &ValueVariable) -> bool {
        if !self.name_allowed(value.name()) {
            return false;
        }
        let mask = self.layout.first().copied().unwrap_or(self.tail);
        mask.intersects(value.variable_type())
    }

    /// Validates any variable; nodes never match.
    #[must_use]
    pub fn validate_variable(&self, variable: &Variable) -> bool {
        match variable {
            Variable::Value(v) => self.validate_value(v),
            Variable::Identifier(id) => self.validate_identifier(id),
            Variable::Node(_) => false,
        }
    }

    /// Name rule for the value at `position` in a run.
    ///
    /// Past the end of the name list, positions still inside the layout
    /// accept any name; positions past both need a tail type.
    fn name_at(&self, position: usize, name: &str) -> bool {
        match &self.names {
            None => true,
            Some(names) => match names.get(position) {
                Some(expected) => names_match(expected, name, self.case_sensitive),
                None => position < self.layout.len() || !self.tail.is_empty(),
            },
        }
    }

    fn type_at(&self, position: usize, ty: VariableType) -> bool {
        let mask = self.layout.get(position).copied().unwrap_or(self.tail);
        mask.intersects(ty)
    }

    fn matches_at(&self, position: usize, value: &ValueVariable) -> bool {
        self.name_at(position, value.name()) && self.type_at(position, value.variable_type())
    }

    /// Finds the runs of child indices that compaction would replace.
    fn find_runs(&self, children: &[Variable], sequential: bool) -> Vec<Vec<usize>> {
        let required = self.names.as_ref().map_or(0, Vec::len).max(self.layout.len());
        let closed_at_required = required > 0 && self.tail.is_empty();

        let mut runs = Vec::new();
        let mut run: Vec<usize> = Vec::new();
        let mut index = 0;
        while index < children.len() {
            let Variable::Value(value) = &children[index] else {
                if sequential && !run.is_empty() {
                    if run.len() >= required {
                        runs.push(std::mem::take(&mut run));
                    }
                    run.clear();
                }
                index += 1;
                continue;
            };

            if self.matches_at(run.len(), value) {
                run.push(index);
                index += 1;
                if closed_at_required && run.len() == required {
                    runs.push(std::mem::take(&mut run));
                }
            } else if run.is_empty() {
                index += 1;
            } else {
                // Close the run and look at the same value again as the
                // first of a new one.
                if run.len() >= required {
                    runs.push(std::mem::take(&mut run));
                }
                run.clear();
            }
        }
        if !run.is_empty() {
            runs.push(run);
        }
        runs
    }

    /// Replaces runs of loose values in `container` with new identifiers.
    ///
    /// Values are matched left to right against the name and layout
    /// positions. A run is emitted as soon as it fills the layout when no
    /// tail is allowed. When a value breaks a run, the run is emitted only
    /// if it is at least as long as the longer of the name list and layout,
    /// and the breaking value is tried again as the start of the next run.
    /// Whatever run is still open at the end of the container is emitted.
    /// An emitted run becomes an identifier named `new_name` holding the
    /// values in order, at the position of the run's first value.
    ///
    /// With `sequential`, an identifier or node between values also closes
    /// the run; otherwise runs may skip over them.
    ///
    /// Returns the number of identifiers created.
    pub fn compact<C: Collection>(&self, container: &mut C, new_name: &str, sequential: bool) -> usize {
        let runs = self.find_runs(container.children(), sequential);
        let children = container.children_mut();
        for run in runs.iter().rev() {
            let mut identifier = Identifier::new(new_name);
            let mut taken: Vec<Variable> = run.iter().rev().map(|&i| children.remove(i)).collect();
            taken.reverse();
            for variable in taken {
                identifier.push(variable);
            }
            children.insert(run[0], Variable::Identifier(identifier));
        }
        debug!(new_name, created = runs.len(), "compacted collection");
        runs.len()
    }

    /// Renames every child identifier that validates; returns the count.
    pub fn rename_identifiers<C: Collection>(&self, container: &mut C, name: &str) -> usize {
        let mut renamed = 0;
        for child in container.children_mut() {
            if let Variable::Identifier(id) = child {
                if self.validate_identifier(id) {
                    id.set_name(name);
                    renamed += 1;
                }
            }
        }
        renamed
    }

    /// Renames every child value that validates; returns the count.
    pub fn rename_values<C: Collection>(&self, container: &mut C, name: &str) -> usize {
        let mut renamed = 0;
        for child in container.children_mut() {
            if let Variable::Value(v) = child {
                if self.validate_value(v) {
                    v.set_name(name);
                    renamed += 1;
                }
            }
        }
        renamed
    }

    pub fn first_matching_identifier<'c, C: Collection>(&self, container: &'c C) -> Option<&'c Identifier> {
        container
            .children()
            .iter()
            .filter_map(Variable::as_identifier)
            .find(|id| self.validate_identifier(id))
    }

    pub fn first_matching_identifier_mut<'c, C: Collection>(
        &self,
        container: &'c mut C,
    ) -> Option<&'c mut Identifier> {
        container
            .children_mut()
            .iter_mut()
            .filter_map(Variable::as_identifier_mut)
            .find(|id| self.validate_identifier(id))
    }

    pub fn first_matching_value<'c, C: Collection>(&self, container: &'c C) -> Option<&'c ValueVariable> {
        container
            .children()
            .iter()
            .filter_map(Variable::as_value_variable)
            .find(|v| self.validate_value(v))
    }

    pub fn first_matching_value_mut<'c, C: Collection>(
        &self,
        container: &'c mut C,
    ) -> Option<&'c mut ValueVariable> {
        container
            .children_mut()
            .iter_mut()
            .filter_map(Variable::as_value_variable_mut)
            .find(|v| self.validate_value(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Node, Value};

    const INT: VariableType = VariableType::INTEGER;
    const STR: VariableType = VariableType::STRING;
    const FLOAT: VariableType = VariableType::FLOAT;

    fn node(children: Vec<Variable>) -> Node {
        let mut node = Node::root();
        for child in children {
            node.push(child);
        }
        node
    }

    fn kinds(node: &Node) -> Vec<VariableType> {
        node.children().iter().map(Variable::variable_type).collect()
    }

    #[test]
    fn test_compact_fills_layout() {
        let mut container = node(vec![
            Variable::int("t", 1),
            Variable::string("t", "x"),
            Variable::float("t", 2.0),
        ]);
        let template = Template::new(["t"], [INT, STR, FLOAT]);

        assert_eq!(template.compact(&mut container, "grp", false), 1);
        assert_eq!(container.len(), 1);
        let grp = container.get_identifier("grp", true).unwrap();
        assert_eq!(
            grp.children(),
            &[
                Variable::int("t", 1),
                Variable::string("t", "x"),
                Variable::float("t", 2.0),
            ]
        );
    }

    #[test]
    fn test_compact_repeats() {
        let mut container = node(vec![
            Variable::int("", 1),
            Variable::int("", 2),
            Variable::int("", 3),
            Variable::int("", 4),
            Variable::int("", 5),
        ]);
        let template = Template::from_layout([INT, INT]);

        assert_eq!(template.compact(&mut container, "pair", false), 3);
        let lengths: Vec<usize> = container
            .children()
            .iter()
            .filter_map(Variable::as_identifier)
            .map(|identifier| identifier.len())
            .collect();
        assert_eq!(lengths, vec![2, 2, 1]);
    }

    #[test]
    fn test_compact_lookback() {
        let mut container = node(vec![
            Variable::string("", "a"),
            Variable::string("", "b"),
            Variable::int("", 1),
        ]);
        let template = Template::from_layout([STR, INT]);

        assert_eq!(template.compact(&mut container, "kv", false), 1);
        assert_eq!(container.get_at(0), Some(&Variable::string("", "a")));
        let kv = container.get_identifier("kv", true).unwrap();
        let values: Vec<&Value> = kv.values().collect();
        assert_eq!(values, vec![&Value::from("b"), &Value::Int(1)]);
    }

    #[test]
    fn test_compact_broken_run_is_left_alone() {
        let mut container = node(vec![
            Variable::int("", 1),
            Variable::string("", "s"),
            Variable::int("", 2),
            Variable::int("", 3),
        ]);
        let template = Template::from_layout([INT, INT]);

        assert_eq!(template.compact(&mut container, "pair", false), 1);
        assert_eq!(kinds(&container), vec![INT, STR, VariableType::IDENTIFIER]);
    }

    #[test]
    fn test_compact_with_tail() {
        let mut container = node(vec![
            Variable::string("", "v"),
            Variable::int("", 1),
            Variable::int("", 2),
            Variable::Node(Node::new("between")),
            Variable::string("", "w"),
            Variable::int("", 3),
        ]);
        let template = Template::from_layout([STR]).with_tail(INT);

        assert_eq!(template.compact(&mut container, "row", false), 2);
        assert_eq!(
            kinds(&container),
            vec![
                VariableType::IDENTIFIER,
                VariableType::NODE,
                VariableType::IDENTIFIER
            ]
        );
        assert_eq!(container.get_at(0).unwrap().as_identifier().unwrap().len(), 3);
        assert_eq!(container.get_at(2).unwrap().as_identifier().unwrap().len(), 2);
    }

    #[test]
    fn test_compact_sequential() {
        const ID: VariableType = VariableType::IDENTIFIER;
        const NODE: VariableType = VariableType::NODE;
        let children = vec![
            Variable::int("", 1),
            Variable::Node(Node::new("gap")),
            Variable::int("", 2),
            Variable::int("", 3),
            Variable::Node(Node::new("end")),
        ];
        let template = Template::from_layout([INT, INT]);

        let mut spanning = node(children.clone());
        assert_eq!(template.compact(&mut spanning, "pair", false), 2);
        assert_eq!(kinds(&spanning), vec![ID, NODE, ID, NODE]);
        assert_eq!(spanning.get_at(0).unwrap().as_identifier().unwrap().len(), 2);

        let mut strict = node(children);
        assert_eq!(template.compact(&mut strict, "pair", true), 1);
        assert_eq!(kinds(&strict), vec![INT, NODE, ID, NODE]);
    }

    #[test]
    fn test_compact_emits_open_run_at_end() {
        let mut container = node(vec![
            Variable::string("", "skip"),
            Variable::int("", 1),
        ]);
        let template = Template::from_layout([INT, INT]);

        assert_eq!(template.compact(&mut container, "pair", false), 1);
        assert_eq!(kinds(&container), vec![STR, VariableType::IDENTIFIER]);
    }

    #[test]
    fn test_compact_names_positional() {
        let mut container = node(vec![
            Variable::int("y", 1),
            Variable::int("x", 2),
            Variable::int("y", 3),
        ]);
        let template = Template::new(["x", "y"], [INT, INT]);

        assert_eq!(template.compact(&mut container, "point", false), 1);
        assert_eq!(container.get_at(0), Some(&Variable::int("y", 1)));
        assert_eq!(container.get_identifier("point", true).unwrap().len(), 2);
    }

    #[test]
    fn test_compact_nothing_to_do() {
        let mut empty = Node::root();
        assert_eq!(Template::from_layout([INT]).compact(&mut empty, "x", false), 0);

        let mut container = node(vec![Variable::int("", 1)]);
        assert_eq!(Template::default().compact(&mut container, "x", false), 0);
        assert_eq!(container.len(), 1);
    }

    #[test]
    fn test_validate_identifier_counts() {
        let template = Template::from_layout([INT, STR]);
        let exact = Identifier::with_values("p", [Value::Int(1), Value::from("a")]);
        let short = Identifier::with_values("p", [1]);
        let long = Identifier::with_values("p", [Value::Int(1), Value::from("a"), Value::Int(2)]);

        assert!(template.validate_identifier(&exact));
        assert!(!template.validate_identifier(&short));
        assert!(!template.validate_identifier(&long));
        assert!(template.clone().with_tail(INT).validate_identifier(&long));
        assert!(!template.with_tail(FLOAT).validate_identifier(&long));
    }

    #[test]
    fn test_validate_identifier_types_and_names() {
        let template = Template::new(["Point"], [INT | FLOAT, INT | FLOAT]);
        let mixed = Identifier::with_values("point", [Value::Int(1), Value::Float(2.5)]);
        let wrong = Identifier::with_values("point", [Value::Int(1), Value::from("y")]);

        assert!(template.validate_identifier(&mixed));
        assert!(!template.validate_identifier(&wrong));
        assert!(!template
            .clone()
            .case_sensitive(true)
            .validate_identifier(&mixed));
        let renamed = Identifier::with_values("other", [1, 2]);
        assert!(!template.validate_identifier(&renamed));
    }

    #[test]
    fn test_validate_empty_layout() {
        let flag = Template::new(["enabled"], Vec::new());
        assert!(flag.validate_identifier(&Identifier::new("enabled")));
        assert!(!flag.validate_identifier(&Identifier::with_values("enabled", [1])));
        let list = Template::from_layout(Vec::new()).with_tail(VariableType::VALUE);
        assert!(list.validate_identifier(&Identifier::with_values("any", [1, 2, 3])));
    }

    #[test]
    fn test_validate_value() {
        let template = Template::new(["port"], [INT]);
        assert!(template.validate_value(&ValueVariable::new("PORT", 80)));
        assert!(!template.validate_value(&ValueVariable::new("port", "80")));
        assert!(!template.validate_value(&ValueVariable::new("host", 80)));

        let tail_only = Template::from_layout(Vec::new()).with_tail(STR);
        assert!(tail_only.validate_value(&ValueVariable::new("x", "s")));
        assert!(!Template::default().validate_value(&ValueVariable::new("x", "s")));
    }

    #[test]
    fn test_validate_variable() {
        let template = Template::from_layout([INT]);
        assert!(template.validate_variable(&Variable::int("a", 1)));
        assert!(template.validate_variable(&Variable::Identifier(Identifier::with_values(
            "a",
            [1]
        ))));
        assert!(!template.validate_variable(&Variable::Node(Node::new("a"))));
    }

    #[test]
    fn test_rename() {
        let mut container = node(vec![
            Variable::Identifier(Identifier::with_values("pos", [1, 2])),
            Variable::Identifier(Identifier::with_values("pos", [1])),
            Variable::Identifier(Identifier::with_values("other", [3, 4])),
            Variable::int("a", 1),
            Variable::string("b", "x"),
        ]);
        let pair = Template::from_layout([INT, INT]);
        assert_eq!(pair.rename_identifiers(&mut container, "pair"), 2);
        let names: Vec<&str> = container.children().iter().map(Variable::name).collect();
        assert_eq!(names, vec!["pair", "pos", "pair", "a", "b"]);

        let ints = Template::from_layout([INT]);
        assert_eq!(ints.rename_values(&mut container, "n"), 1);
        assert_eq!(container.get_int("n", true), Some(1));
    }

    #[test]
    fn test_first_matching() {
        let mut container = node(vec![
            Variable::string("s", "x"),
            Variable::int("a", 1),
            Variable::Identifier(Identifier::with_values("id", [5])),
            Variable::int("b", 2),
        ]);
        let ints = Template::from_layout([INT]);

        assert_eq!(ints.first_matching_value(&container).unwrap().name(), "a");
        assert_eq!(ints.first_matching_identifier(&container).unwrap().name(), "id");
        assert!(Template::from_layout([FLOAT])
            .first_matching_value(&container)
            .is_none());

        ints.first_matching_value_mut(&mut container)
            .unwrap()
            .set_from_str("10");
        assert_eq!(container.get_int("a", true), Some(10));
        ints.first_matching_identifier_mut(&mut container)
            .unwrap()
            .set_name("renamed");
        assert!(container.get_identifier("renamed", true).is_some());
    }
}
