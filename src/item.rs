use std::fmt;

/// The catalog kind of a line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
    Part,
    Instruction,
    Set,
    Box,
}

impl Kind {
    fn as_str(self) -> &'static str {
        match self {
            Kind::Part => "P",
            Kind::Instruction => "I",
            Kind::Set => "S",
            Kind::Box => "B",
        }
    }
}

/// The condition a catalog line was offered or wanted in.
///
/// `Any` only ever appears on the demand side (a wanted-list entry that will
/// accept either condition); offers themselves are always `New` or `Used`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Condition {
    New,
    Used,
    Any,
}

impl Condition {
    fn as_str(self) -> &'static str {
        match self {
            Condition::New => "N",
            Condition::Used => "U",
            Condition::Any => "A",
        }
    }
}

/// A canonical identifier for one catalog line: kind, part id, condition,
/// and (for parts only) a color.
///
/// Equality, ordering, and hashing use every present field. The textual form
/// (`Display`) is stable and doubles as the key used in LP emission and
/// cache digests, so it must never change shape once seen in the wild.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Item {
    kind: Kind,
    part_id: String,
    condition: Condition,
    color_id: Option<u32>,
}

impl Item {
    /// Builds a part item. Parts always carry a color.
    pub fn part(part_id: impl Into<String>, condition: Condition, color_id: u32) -> Self {
        Item {
            kind: Kind::Part,
            part_id: part_id.into(),
            condition,
            color_id: Some(color_id),
        }
    }

    /// Builds a non-part item (instructions, sets, boxes). These carry no color.
    pub fn non_part(kind: Kind, part_id: impl Into<String>, condition: Condition) -> Self {
        assert_ne!(kind, Kind::Part, "use Item::part for colored catalog lines");
        Item {
            kind,
            part_id: part_id.into(),
            condition,
            color_id: None,
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn part_id(&self) -> &str {
        &self.part_id
    }

    pub fn condition(&self) -> Condition {
        self.condition
    }

    pub fn color_id(&self) -> Option<u32> {
        self.color_id
    }

    /// Returns the same item with its condition replaced, used by the parts
    /// aggregator when falling back from an exact condition match to `Any`.
    pub fn with_condition(&self, condition: Condition) -> Self {
        Item {
            condition,
            ..self.clone()
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.color_id {
            Some(color) => write!(
                f,
                "{}__{}__{}__{}",
                self.kind.as_str(),
                self.part_id,
                self.condition.as_str(),
                color
            ),
            None => write!(
                f,
                "{}__{}__{}",
                self.kind.as_str(),
                self.part_id,
                self.condition.as_str()
            ),
        }
    }
}
