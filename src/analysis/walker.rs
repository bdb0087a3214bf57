//! Synchronized traversal of a schema tree and a record value
//!
//! The walker never fails: positions whose runtime shape does not fit the
//! schema are counted as invalid and come back as [`EnrichedValue::Null`].

use tracing::debug;

use super::aggregate::AggregateTable;
use super::enriched::EnrichedValue;
use super::quality::RecordQuality;
use crate::inference::DataTypeClassifier;
use crate::schema::{NodeKind, PrimitiveKind, SchemaNode};
use crate::value::Value;

/// One walker pass over a single record
pub(crate) struct Walker<'a> {
    classifier: &'a DataTypeClassifier,
    aggregates: &'a mut AggregateTable,
    quality: RecordQuality,
}

impl<'a> Walker<'a> {
    pub(crate) fn new(classifier: &'a DataTypeClassifier, aggregates: &'a mut AggregateTable) -> Self {
        Self {
            classifier,
            aggregates,
            quality: RecordQuality::default(),
        }
    }

    /// Counters gathered so far in this pass
    pub(crate) fn into_quality(self) -> RecordQuality {
        self.quality
    }

    pub(crate) fn walk(&mut self, node: &SchemaNode, value: &Value) -> EnrichedValue {
        match &node.kind {
            NodeKind::Primitive(_) | NodeKind::Enum { .. } | NodeKind::Fixed { .. } => {
                self.walk_leaf(node, value)
            }
            NodeKind::Record { name, fields, .. } => match value {
                Value::Null => {
                    self.quality.count_null();
                    EnrichedValue::Null
                }
                Value::Record(_) => EnrichedValue::Record(
                    fields
                        .iter()
                        .map(|field| {
                            let field_value = value.get(&field.name).unwrap_or(&Value::Null);
                            (field.name.clone(), self.walk(&field.node, field_value))
                        })
                        .collect(),
                ),
                other => {
                    self.mismatch(node, other);
                    debug!("Expected record '{}'", name);
                    EnrichedValue::Null
                }
            },
            NodeKind::Array(items) => match value {
                Value::Null => EnrichedValue::Array(Vec::new()),
                Value::Array(elements) => EnrichedValue::Array(
                    elements.iter().map(|e| self.walk(items, e)).collect(),
                ),
                other => {
                    self.mismatch(node, other);
                    EnrichedValue::Array(Vec::new())
                }
            },
            NodeKind::Union(members) => {
                if value.is_null() {
                    self.quality.count_null();
                    return EnrichedValue::Null;
                }
                match select_member(members, value) {
                    Some(member) => self.walk(member, value),
                    None => {
                        self.mismatch(node, value);
                        EnrichedValue::Null
                    }
                }
            }
        }
    }

    fn walk_leaf(&mut self, node: &SchemaNode, value: &Value) -> EnrichedValue {
        let data_type = self.classifier.classify(value);
        self.aggregates.observe(node, data_type);
        self.quality.count_leaf(data_type);
        EnrichedValue::Leaf {
            value: value.clone(),
            data_type,
        }
    }

    fn mismatch(&mut self, node: &SchemaNode, value: &Value) {
        debug!(
            "Value shape {} does not match {} node {:?}",
            shape_name(value),
            node.type_name(),
            node.id
        );
        self.quality.count_mismatch();
    }
}

/// Pick the union member matching the runtime shape of a non-null value
///
/// Leaves prefer an exact kind, then a promoted kind, then any non-null
/// primitive member. Records pick the record member sharing the most field
/// names; arrays the first array member. Ties go to declaration order.
pub(crate) fn select_member<'n>(members: &'n [SchemaNode], value: &Value) -> Option<&'n SchemaNode> {
    match value {
        Value::Record(fields) => {
            let mut best: Option<(&SchemaNode, usize)> = None;
            for member in members {
                if let NodeKind::Record { fields: declared, .. } = &member.kind {
                    let score = fields
                        .iter()
                        .filter(|(name, _)| declared.iter().any(|d| &d.name == name))
                        .count();
                    if best.is_none_or(|(_, s)| score > s) {
                        best = Some((member, score));
                    }
                }
            }
            best.map(|(member, _)| member)
        }
        Value::Array(_) => members
            .iter()
            .find(|m| matches!(m.kind, NodeKind::Array(_))),
        leaf => {
            let kind = leaf.primitive_kind()?;
            members
                .iter()
                .find(|m| m.leaf_kind() == Some(kind))
                .or_else(|| {
                    promotions(kind).iter().find_map(|target| {
                        members.iter().find(|m| m.leaf_kind() == Some(*target))
                    })
                })
                .or_else(|| {
                    members
                        .iter()
                        .find(|m| m.leaf_kind().is_some_and(|k| k != PrimitiveKind::Null))
                })
        }
    }
}

/// Kinds a leaf value may be read as, in order of preference
fn promotions(kind: PrimitiveKind) -> &'static [PrimitiveKind] {
    use PrimitiveKind::*;
    match kind {
        Int => &[Long, Float, Double],
        Long => &[Float, Double],
        Float => &[Double],
        String => &[Enum, Bytes],
        Bytes => &[Fixed, String],
        _ => &[],
    }
}

fn shape_name(value: &Value) -> &'static str {
    match value {
        Value::Record(_) => "record",
        Value::Array(_) => "array",
        other => other
            .primitive_kind()
            .map(|k| k.type_name())
            .unwrap_or("unknown"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldDef, Schema, SchemaTree};

    fn members_of(tree: &SchemaTree) -> &[SchemaNode] {
        match &tree.root().kind {
            NodeKind::Union(members) => members,
            other => panic!("Expected union, got {:?}", other),
        }
    }

    #[test]
    fn test_select_exact_then_promoted() {
        let tree = SchemaTree::build(&Schema::union(vec![
            Schema::null(),
            Schema::primitive(PrimitiveKind::Double),
            Schema::primitive(PrimitiveKind::Long),
            Schema::string(),
        ]))
        .unwrap();
        let members = members_of(&tree);

        let long = select_member(members, &Value::Long(1)).unwrap();
        assert_eq!(long.id, members[2].id);
        let int = select_member(members, &Value::Int(1)).unwrap();
        assert_eq!(int.id, members[2].id);
        let float = select_member(members, &Value::Float(1.5)).unwrap();
        assert_eq!(float.id, members[1].id);
        // Booleans have no promotion, so they fall back to the first non-null leaf
        let boolean = select_member(members, &Value::Boolean(true)).unwrap();
        assert_eq!(boolean.id, members[1].id);
    }

    #[test]
    fn test_select_record_by_field_overlap() {
        let tree = SchemaTree::build(&Schema::union(vec![
            Schema::record("A", vec![FieldDef::new("x", Schema::string())]),
            Schema::record(
                "B",
                vec![
                    FieldDef::new("x", Schema::string()),
                    FieldDef::new("y", Schema::string()),
                ],
            ),
        ]))
        .unwrap();
        let members = members_of(&tree);

        let value = Value::record([("x", Value::from("1")), ("y", Value::from("2"))]);
        assert_eq!(select_member(members, &value).unwrap().id, members[1].id);

        let value = Value::record([("x", Value::from("1"))]);
        assert_eq!(select_member(members, &value).unwrap().id, members[0].id);
    }

    #[test]
    fn test_select_no_match() {
        let tree = SchemaTree::build(&Schema::optional(Schema::string())).unwrap();
        let members = members_of(&tree);
        assert!(select_member(members, &Value::Array(vec![])).is_none());
        assert!(select_member(members, &Value::record([("a", Value::Null)])).is_none());
    }

    #[test]
    fn test_walk_missing_field_counts_as_empty() {
        let tree = SchemaTree::build(&Schema::record(
            "R",
            vec![
                FieldDef::new("a", Schema::string()),
                FieldDef::new("b", Schema::string()),
            ],
        ))
        .unwrap();
        let classifier = DataTypeClassifier::new();
        let mut table = AggregateTable::new(tree.node_count());
        let mut walker = Walker::new(&classifier, &mut table);

        let enriched = walker.walk(tree.root(), &Value::record([("a", Value::from("x"))]));
        let quality = walker.into_quality();

        assert_eq!(
            enriched.get("b").and_then(EnrichedValue::data_type),
            Some(crate::inference::DataTypeCategory::Empty)
        );
        assert_eq!(quality.null_fields, 1);
        assert_eq!(quality.valid_fields, 1);
    }

    #[test]
    fn test_walk_shape_mismatch_is_recovered() {
        let tree = SchemaTree::build(&Schema::record(
            "R",
            vec![
                FieldDef::new("tags", Schema::array(Schema::string())),
                FieldDef::new("name", Schema::string()),
            ],
        ))
        .unwrap();
        let classifier = DataTypeClassifier::new();
        let mut table = AggregateTable::new(tree.node_count());
        let mut walker = Walker::new(&classifier, &mut table);

        let enriched = walker.walk(
            tree.root(),
            &Value::record([("tags", Value::from("oops")), ("name", Value::from("Bob"))]),
        );
        let quality = walker.into_quality();

        assert_eq!(enriched.get("tags"), Some(&EnrichedValue::Array(vec![])));
        assert_eq!(
            enriched.get("name").and_then(EnrichedValue::data_type),
            Some(crate::inference::DataTypeCategory::String)
        );
        assert_eq!(quality.invalid_fields, 1);
    }

    #[test]
    fn test_walk_missing_nested_record_counts_as_null() {
        let tree = SchemaTree::build(&Schema::record(
            "Person",
            vec![
                FieldDef::new("name", Schema::string()),
                FieldDef::new(
                    "address",
                    Schema::record("Address", vec![FieldDef::new("city", Schema::string())]),
                ),
            ],
        ))
        .unwrap();
        let classifier = DataTypeClassifier::new();
        let mut table = AggregateTable::new(tree.node_count());
        let mut walker = Walker::new(&classifier, &mut table);

        let enriched = walker.walk(tree.root(), &Value::record([("name", Value::from("Ann"))]));
        walker.walk(
            tree.root(),
            &Value::record([("name", Value::from("Bob")), ("address", Value::Null)]),
        );
        let quality = walker.into_quality();

        assert_eq!(enriched.get("address"), Some(&EnrichedValue::Null));
        assert_eq!(quality.null_fields, 2);
        assert_eq!(quality.valid_fields, 2);
        assert_eq!(quality.invalid_fields, 0);
        let city = tree.root().field("address").unwrap().field("city").unwrap();
        assert!(table.snapshot(city.id).is_empty());
    }

    #[test]
    fn test_select_enum_member_for_text() {
        let tree = SchemaTree::build(&Schema::union(vec![
            Schema::null(),
            Schema::enumeration("Status", ["OPEN", "CLOSED"]),
        ]))
        .unwrap();
        let members = members_of(&tree);
        let picked = select_member(members, &Value::from("OPEN")).unwrap();
        assert_eq!(picked.id, members[1].id);
    }
}
