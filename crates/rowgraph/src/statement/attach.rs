//! Attaching typed values to statement targets.

use super::pattern::{RelationStatement, ThingStatement, UnboundVariable};
use crate::schema::Value;

/// A statement that typed attribute values can be attached to.
///
/// Things and relations grow in place and return their own kind. An unbound
/// variable becomes a [`ThingStatement`] on the first attachment, so every
/// later value has to be attached to that result rather than the variable.
pub trait Attachable: Sized {
    type Output: Attachable<Output = Self::Output>;

    /// Attach one value under an attribute type.
    fn attach(self, attribute_type: &str, value: Value) -> Self::Output;

    /// What to hand back when nothing was attached.
    fn unattached(self) -> Option<Self::Output>;
}

impl Attachable for ThingStatement {
    type Output = ThingStatement;

    fn attach(self, attribute_type: &str, value: Value) -> Self::Output {
        self.has(attribute_type, value)
    }

    fn unattached(self) -> Option<Self::Output> {
        Some(self)
    }
}

impl Attachable for RelationStatement {
    type Output = RelationStatement;

    fn attach(self, attribute_type: &str, value: Value) -> Self::Output {
        self.has(attribute_type, value)
    }

    fn unattached(self) -> Option<Self::Output> {
        Some(self)
    }
}

impl Attachable for UnboundVariable {
    type Output = ThingStatement;

    fn attach(self, attribute_type: &str, value: Value) -> Self::Output {
        self.has(attribute_type, value)
    }

    fn unattached(self) -> Option<Self::Output> {
        None
    }
}

/// Attach every value in order, threading each result into the next call.
pub fn attach_values<T: Attachable>(
    target: T,
    attribute_type: &str,
    values: impl IntoIterator<Item = Value>,
) -> Option<T::Output> {
    let mut values = values.into_iter();
    let Some(first) = values.next() else {
        return target.unattached();
    };
    let statement = target.attach(attribute_type, first);
    Some(values.fold(statement, |statement, value| {
        statement.attach(attribute_type, value)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbound_chains_all_values() {
        let stmt = attach_values(
            UnboundVariable::named("x"),
            "tag",
            vec![Value::from("a"), Value::from("b"), Value::from("c")],
        )
        .unwrap();
        assert_eq!(stmt.attributes.len(), 3);
        assert_eq!(stmt.to_string(), r#"$x has tag "a", has tag "b", has tag "c""#);
    }

    #[test]
    fn test_unbound_without_values_is_none() {
        assert!(attach_values(UnboundVariable::named("x"), "tag", Vec::new()).is_none());
    }

    #[test]
    fn test_thing_without_values_is_unchanged() {
        let thing = UnboundVariable::named("e").isa("person");
        let result = attach_values(thing.clone(), "tag", Vec::new());
        assert_eq!(result, Some(thing));
    }

    #[test]
    fn test_relation_attach() {
        let rel = UnboundVariable::named("r").rel("member", UnboundVariable::named("p"));
        let result = attach_values(rel, "weight", vec![Value::Double(0.5)]).unwrap();
        assert_eq!(result.values_of("weight"), vec![&Value::Double(0.5)]);
        assert_eq!(result.role_players.len(), 1);
    }
}
