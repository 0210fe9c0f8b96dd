//! Query Builder Types - Core types for query building

/// Sort direction of one sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl OrderDirection {
    pub fn from_ascending(ascending: bool) -> Self {
        if ascending {
            OrderDirection::Asc
        } else {
            OrderDirection::Desc
        }
    }

    /// Value used in a `$sort` stage
    pub fn as_i32(self) -> i32 {
        match self {
            OrderDirection::Asc => 1,
            OrderDirection::Desc => -1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_sort_values() {
        assert_eq!(OrderDirection::from_ascending(true).as_i32(), 1);
        assert_eq!(OrderDirection::from_ascending(false).as_i32(), -1);
    }
}
