use std::fmt;
use std::str::FromStr;

use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub name: String,
    pub password_hash: String,
    pub hashing_algorithm: String,
    pub tags: UserTags,
}

/// Body of `PUT api/users/{name}`.
///
/// `tags` is always sent; an empty set becomes `""`, which the broker reads
/// as "no tags".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserSettings {
    pub password: String,
    #[serde(default)]
    pub tags: UserTags,
}

impl UserSettings {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
            tags: UserTags::default(),
        }
    }

    #[must_use]
    pub fn with_tag(mut self, tag: UserTag) -> Self {
        self.tags.insert(tag);
        self
    }
}

/// Permission tag granted to a management user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UserTag {
    Administrator,
    Monitoring,
    Policymaker,
    Management,
    Impersonator,
    /// A tag this client does not know by name.
    Other(String),
}

impl UserTag {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Administrator => "administrator",
            Self::Monitoring => "monitoring",
            Self::Policymaker => "policymaker",
            Self::Management => "management",
            Self::Impersonator => "impersonator",
            Self::Other(other) => other,
        }
    }
}

impl fmt::Display for UserTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserTag {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "administrator" => Self::Administrator,
            "monitoring" => Self::Monitoring,
            "policymaker" => Self::Policymaker,
            "management" => Self::Management,
            "impersonator" => Self::Impersonator,
            other => Self::Other(other.to_owned()),
        })
    }
}

/// Ordered, duplicate-free set of user tags.
///
/// Serialized as the comma-joined string the broker expects on input
/// (`"monitoring,management"`). Deserialized from either that form or a
/// JSON array, which newer brokers return.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserTags(Vec<UserTag>);

impl UserTags {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tag unless it is already present.
    pub fn insert(&mut self, tag: UserTag) {
        if !self.0.contains(&tag) {
            self.0.push(tag);
        }
    }

    #[must_use]
    pub fn contains(&self, tag: &UserTag) -> bool {
        self.0.contains(tag)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UserTag> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Same tags regardless of order.
    #[must_use]
    pub fn same_set(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|tag| other.contains(tag))
    }

    fn parse_joined(joined: &str) -> Self {
        joined
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .filter_map(|t| t.parse().ok())
            .collect()
    }
}

impl FromIterator<UserTag> for UserTags {
    fn from_iter<I: IntoIterator<Item = UserTag>>(iter: I) -> Self {
        let mut tags = Self::new();
        for tag in iter {
            tags.insert(tag);
        }
        tags
    }
}

impl<'a> IntoIterator for &'a UserTags {
    type Item = &'a UserTag;
    type IntoIter = std::slice::Iter<'a, UserTag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for UserTags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, tag) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(tag.as_str())?;
        }
        Ok(())
    }
}

impl Serialize for UserTags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for UserTags {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TagsVisitor;

        impl<'de> Visitor<'de> for TagsVisitor {
            type Value = UserTags;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a comma-separated tag string or an array of tags")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<UserTags, E> {
                Ok(UserTags::parse_joined(value))
            }

            fn visit_unit<E: de::Error>(self) -> Result<UserTags, E> {
                Ok(UserTags::new())
            }

            fn visit_none<E: de::Error>(self) -> Result<UserTags, E> {
                Ok(UserTags::new())
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<UserTags, A::Error> {
                let mut tags = UserTags::new();
                while let Some(raw) = seq.next_element::<String>()? {
                    tags.0.extend(UserTags::parse_joined(&raw).0);
                }
                Ok(tags.0.into_iter().collect())
            }
        }

        deserializer.deserialize_any(TagsVisitor)
    }
}
