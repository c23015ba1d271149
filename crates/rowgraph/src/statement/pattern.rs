//! Insert statement fragments rendered as TypeQL.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::schema::Value;

/// A statement variable not yet bound to a type or value (`$name`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnboundVariable {
    name: String,
}

impl UnboundVariable {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `$x isa <type>`
    pub fn isa(self, thing_type: impl Into<String>) -> ThingStatement {
        ThingStatement::new(self).isa(thing_type)
    }

    /// `$x has <type> <value>`
    pub fn has(self, attribute_type: impl Into<String>, value: impl Into<Value>) -> ThingStatement {
        ThingStatement::new(self).has(attribute_type, value)
    }

    /// `$x <value>`, a free-standing attribute predicate.
    pub fn eq_value(self, value: impl Into<Value>) -> AttributeStatement {
        AttributeStatement {
            var: self,
            value: value.into(),
            isa: None,
        }
    }

    /// `$x (<role>: $player)`
    pub fn rel(self, role: impl Into<String>, player: UnboundVariable) -> RelationStatement {
        RelationStatement::new(self).rel(role, player)
    }
}

impl fmt::Display for UnboundVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.name)
    }
}

/// One `has <type> <value>` constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Has {
    pub attribute_type: String,
    pub value: Value,
}

impl fmt::Display for Has {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "has {} {}", self.attribute_type, self.value)
    }
}

/// Entity-like statement: `$x isa <type>, has ...`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThingStatement {
    pub var: UnboundVariable,
    pub isa: Option<String>,
    pub attributes: Vec<Has>,
}

impl ThingStatement {
    pub fn new(var: UnboundVariable) -> Self {
        Self {
            var,
            isa: None,
            attributes: Vec::new(),
        }
    }

    pub fn isa(mut self, thing_type: impl Into<String>) -> Self {
        self.isa = Some(thing_type.into());
        self
    }

    pub fn has(mut self, attribute_type: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.push(Has {
            attribute_type: attribute_type.into(),
            value: value.into(),
        });
        self
    }

    /// Values attached under an attribute type, in attachment order.
    pub fn values_of(&self, attribute_type: &str) -> Vec<&Value> {
        values_of(&self.attributes, attribute_type)
    }
}

impl fmt::Display for ThingStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.var)?;
        write_constraints(f, self.isa.as_deref(), &self.attributes)
    }
}

/// A role and the variable playing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePlayer {
    pub role: String,
    pub player: UnboundVariable,
}

/// Relation statement: `$r (<role>: $p, ...) isa <type>, has ...`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationStatement {
    pub var: UnboundVariable,
    pub role_players: Vec<RolePlayer>,
    pub isa: Option<String>,
    pub attributes: Vec<Has>,
}

impl RelationStatement {
    pub fn new(var: UnboundVariable) -> Self {
        Self {
            var,
            role_players: Vec::new(),
            isa: None,
            attributes: Vec::new(),
        }
    }

    pub fn rel(mut self, role: impl Into<String>, player: UnboundVariable) -> Self {
        self.role_players.push(RolePlayer {
            role: role.into(),
            player,
        });
        self
    }

    pub fn isa(mut self, relation_type: impl Into<String>) -> Self {
        self.isa = Some(relation_type.into());
        self
    }

    pub fn has(mut self, attribute_type: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.push(Has {
            attribute_type: attribute_type.into(),
            value: value.into(),
        });
        self
    }

    pub fn values_of(&self, attribute_type: &str) -> Vec<&Value> {
        values_of(&self.attributes, attribute_type)
    }
}

impl fmt::Display for RelationStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.var)?;
        if !self.role_players.is_empty() {
            let players: Vec<String> = self
                .role_players
                .iter()
                .map(|rp| format!("{}: {}", rp.role, rp.player))
                .collect();
            write!(f, " ({})", players.join(", "))?;
        }
        write_constraints(f, self.isa.as_deref(), &self.attributes)
    }
}

/// Free-standing attribute: `$a <value> isa <type>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeStatement {
    pub var: UnboundVariable,
    pub value: Value,
    pub isa: Option<String>,
}

impl AttributeStatement {
    pub fn isa(mut self, attribute_type: impl Into<String>) -> Self {
        self.isa = Some(attribute_type.into());
        self
    }
}

impl fmt::Display for AttributeStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.var, self.value)?;
        if let Some(isa) = &self.isa {
            write!(f, " isa {isa}")?;
        }
        Ok(())
    }
}

/// A complete statement ready to submit: `insert <pattern>;`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InsertStatement {
    Thing(ThingStatement),
    Relation(RelationStatement),
    Attribute(AttributeStatement),
}

impl fmt::Display for InsertStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertStatement::Thing(s) => write!(f, "insert {s};"),
            InsertStatement::Relation(s) => write!(f, "insert {s};"),
            InsertStatement::Attribute(s) => write!(f, "insert {s};"),
        }
    }
}

impl From<ThingStatement> for InsertStatement {
    fn from(s: ThingStatement) -> Self {
        InsertStatement::Thing(s)
    }
}

impl From<RelationStatement> for InsertStatement {
    fn from(s: RelationStatement) -> Self {
        InsertStatement::Relation(s)
    }
}

impl From<AttributeStatement> for InsertStatement {
    fn from(s: AttributeStatement) -> Self {
        InsertStatement::Attribute(s)
    }
}

fn values_of<'a>(attributes: &'a [Has], attribute_type: &str) -> Vec<&'a Value> {
    attributes
        .iter()
        .filter(|h| h.attribute_type == attribute_type)
        .map(|h| &h.value)
        .collect()
}

fn write_constraints(f: &mut fmt::Formatter<'_>, isa: Option<&str>, attributes: &[Has]) -> fmt::Result {
    let mut first = true;
    if let Some(isa) = isa {
        write!(f, " isa {isa}")?;
        first = false;
    }
    for has in attributes {
        if first {
            write!(f, " {has}")?;
            first = false;
        } else {
            write!(f, ", {has}")?;
        }
    }
    Ok(())
}
