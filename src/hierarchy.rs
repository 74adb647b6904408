//! Static type and member hierarchy consumed by the inheritance resolver.
//!
//! The host framework's reflection (or equivalent static metadata) layer is
//! expected to precompute this table once per build. The resolver only ever
//! reads the pure data in here, never live runtime type objects, so member key
//! generation stays deterministic and total over the graph.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kind of a documentable program element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    /// A type (class, interface, enum)
    Type,
    /// A property
    Property,
    /// A field (including enum variants)
    Field,
    /// A method
    Method,
}

impl MemberKind {
    /// Canonical single-letter prefix used in member keys
    pub fn prefix(&self) -> char {
        match self {
            MemberKind::Type => 'T',
            MemberKind::Property => 'P',
            MemberKind::Field => 'F',
            MemberKind::Method => 'M',
        }
    }

    fn from_prefix(c: char) -> Option<Self> {
        match c {
            'T' => Some(MemberKind::Type),
            'P' => Some(MemberKind::Property),
            'F' => Some(MemberKind::Field),
            'M' => Some(MemberKind::Method),
            _ => None,
        }
    }
}

/// A member declared on a type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberDescriptor {
    /// Member name
    pub name: String,
    /// Member kind
    pub kind: MemberKind,
    /// Type id of the member's value type, when known. Used to honor
    /// excluded-type configuration per property.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<String>,
}

impl MemberDescriptor {
    /// Create a member descriptor without value-type information
    pub fn new(name: &str, kind: MemberKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            value_type: None,
        }
    }

    /// Create a member descriptor with value-type information
    pub fn with_value_type(name: &str, kind: MemberKind, value_type: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            value_type: Some(value_type.to_string()),
        }
    }
}

/// One type in the hierarchy graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Canonical type id (full dotted path)
    pub id: String,
    /// Base type id, if the type has a base other than the implicit root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_id: Option<String>,
    /// Implemented interface ids, in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interface_ids: Vec<String>,
    /// Members declared directly on the type
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<MemberDescriptor>,
}

impl TypeDescriptor {
    /// Create a type descriptor with no base, interfaces or members
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            base_id: None,
            interface_ids: Vec::new(),
            members: Vec::new(),
        }
    }

    /// Set the base type id
    pub fn with_base(mut self, base_id: &str) -> Self {
        self.base_id = Some(base_id.to_string());
        self
    }

    /// Append an implemented interface id
    pub fn with_interface(mut self, interface_id: &str) -> Self {
        self.interface_ids.push(interface_id.to_string());
        self
    }

    /// Append a declared member
    pub fn with_member(mut self, member: MemberDescriptor) -> Self {
        self.members.push(member);
        self
    }
}

/// A concrete member reference: a declaring type plus a member on it.
///
/// For `MemberKind::Type` the reference names the type itself and `name` is
/// empty.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MemberRef {
    /// Declaring type id
    pub type_id: String,
    /// Member name (empty for type references)
    pub name: String,
    /// Member kind
    pub kind: MemberKind,
}

impl MemberRef {
    /// Reference a type itself
    pub fn for_type(type_id: &str) -> Self {
        Self {
            type_id: type_id.to_string(),
            name: String::new(),
            kind: MemberKind::Type,
        }
    }

    /// Reference a member declared on a type
    pub fn for_member(type_id: &str, name: &str, kind: MemberKind) -> Self {
        Self {
            type_id: type_id.to_string(),
            name: name.to_string(),
            kind,
        }
    }

    /// The canonical member key for this reference.
    ///
    /// Keys have the form `T:Full.Type`, `P:Full.Type.Name`,
    /// `F:Full.Type.Name` or `M:Full.Type.Name`. Generation is pure: the same
    /// reference always yields the same key, which is the join key between the
    /// hierarchy graph and the documentation store.
    pub fn member_id(&self) -> String {
        match self.kind {
            MemberKind::Type => format!("T:{}", self.type_id),
            _ => format!("{}:{}.{}", self.kind.prefix(), self.type_id, self.name),
        }
    }

    /// Parse a canonical member key back into a reference.
    ///
    /// Member names never contain dots, so the last dotted segment of a
    /// non-type key is the member name and the rest is the declaring type id.
    /// Returns `None` for keys that do not follow the canonical form.
    pub fn parse(member_id: &str) -> Option<Self> {
        let mut chars = member_id.chars();
        let kind = MemberKind::from_prefix(chars.next()?)?;
        if chars.next()? != ':' {
            return None;
        }
        let rest = &member_id[2..];
        if rest.is_empty() {
            return None;
        }
        match kind {
            MemberKind::Type => Some(MemberRef::for_type(rest)),
            _ => {
                let (type_id, name) = rest.rsplit_once('.')?;
                if name.is_empty() {
                    return None;
                }
                Some(MemberRef::for_member(type_id, name, kind))
            }
        }
    }
}

/// Registry of all known type descriptors, keyed by type id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeRegistry {
    types: BTreeMap<String, TypeDescriptor>,
}

impl TypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a type descriptor to the registry
    pub fn insert(&mut self, descriptor: TypeDescriptor) {
        self.types.insert(descriptor.id.clone(), descriptor);
    }

    /// Look up a type descriptor by id
    pub fn get(&self, type_id: &str) -> Option<&TypeDescriptor> {
        self.types.get(type_id)
    }

    /// Find a member declared directly on a type by case-insensitive name.
    ///
    /// Document property keys are typically camelCased while member names keep
    /// their declared casing, so the match ignores ASCII case.
    pub fn find_member(&self, type_id: &str, name: &str) -> Option<MemberRef> {
        let descriptor = self.get(type_id)?;
        descriptor
            .members
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(name))
            .map(|m| MemberRef::for_member(type_id, &m.name, m.kind))
    }

    /// Value type of a member, when the descriptor records one
    pub fn member_value_type(&self, member: &MemberRef) -> Option<&str> {
        let descriptor = self.get(&member.type_id)?;
        descriptor
            .members
            .iter()
            .find(|m| m.name == member.name && m.kind == member.kind)
            .and_then(|m| m.value_type.as_deref())
    }
}
