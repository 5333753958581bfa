//! Spread layouts.
//!
//! A spread is a fixed, ordered list of named positions. The layout
//! coordinates are only carried through for whatever renders the board.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// One slot in a spread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Stable identifier within the spread.
    pub id: String,
    /// Display name (e.g. "过去").
    pub name: String,
    /// What this position signifies.
    pub description: String,
    /// Horizontal layout coordinate.
    pub x: f32,
    /// Vertical layout coordinate.
    pub y: f32,
    /// Rotation in degrees, for crossing cards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f32>,
}

impl Position {
    /// Create an unrotated position.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        x: f32,
        y: f32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            x,
            y,
            rotation: None,
        }
    }

    /// Set the rotation in degrees.
    pub fn rotated(mut self, degrees: f32) -> Self {
        self.rotation = Some(degrees);
        self
    }
}

/// A named layout with a fixed card count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpreadDefinition {
    /// Stable identifier (`single`, `three_card`, ...).
    pub id: String,
    /// Display name.
    pub name: String,
    /// What the spread is for.
    pub description: String,
    /// Number of cards the spread takes.
    pub card_count: usize,
    /// Positions in draw order.
    pub positions: Vec<Position>,
}

impl SpreadDefinition {
    /// Check that the spread is internally consistent.
    pub fn validate(&self) -> CoreResult<()> {
        if self.card_count == 0 {
            return Err(CoreError::EmptySpread(self.id.clone()));
        }
        if self.positions.len() != self.card_count {
            return Err(CoreError::PositionCountMismatch {
                spread: self.id.clone(),
                card_count: self.card_count,
                positions: self.positions.len(),
            });
        }
        Ok(())
    }

    /// Check consistency and that a catalog of `catalog_len` cards can fill it.
    pub fn validate_against(&self, catalog_len: usize) -> CoreResult<()> {
        self.validate()?;
        if self.card_count > catalog_len {
            return Err(CoreError::SpreadExceedsCatalog {
                requested: self.card_count,
                available: catalog_len,
            });
        }
        Ok(())
    }
}

/// The spreads that ship with the application.
pub fn shipped_spreads() -> Vec<SpreadDefinition> {
    vec![
        SpreadDefinition {
            id: "single".to_string(),
            name: "每日指引 (单张)".to_string(),
            description: "抽取一张牌，获得当下的核心指引或简单问题的答案。".to_string(),
            card_count: 1,
            positions: vec![Position::new(
                "core",
                "核心指引",
                "问题的核心能量或直接答案",
                0.0,
                0.0,
            )],
        },
        SpreadDefinition {
            id: "three_card".to_string(),
            name: "圣三角 (时间流)".to_string(),
            description: "经典的过去、现在、未来牌阵，理清事情的脉络。".to_string(),
            card_count: 3,
            positions: vec![
                Position::new("past", "过去", "导致当前情况的过往因素", -1.0, 0.0),
                Position::new("present", "现在", "当下的能量和状态", 0.0, 0.0),
                Position::new("future", "未来", "按照当前趋势发展的可能结果", 1.0, 0.0),
            ],
        },
        SpreadDefinition {
            id: "celtic_cross".to_string(),
            name: "凯尔特十字".to_string(),
            description: "深入分析复杂问题的经典牌阵，涵盖内在、外在、障碍与结果。".to_string(),
            card_count: 10,
            positions: vec![
                Position::new("p1", "现状", "核心问题", -2.0, 0.0),
                Position::new("p2", "阻碍/助力", "交叉的影响因素", -2.0, 0.0).rotated(90.0),
                Position::new("p3", "潜意识/根源", "事情的基础", -2.0, 1.2),
                Position::new("p4", "过去", "刚发生的影响", -3.2, 0.0),
                Position::new("p5", "表意识/目标", "最好的结果或目标", -2.0, -1.2),
                Position::new("p6", "未来", "即将发生的事情", -0.8, 0.0),
                Position::new("p7", "自我", "当事人的态度", 2.0, 1.5),
                Position::new("p8", "环境", "周遭的影响", 2.0, 0.5),
                Position::new("p9", "希望/恐惧", "心理预期", 2.0, -0.5),
                Position::new("p10", "结果", "最终的综合结果", 2.0, -1.5),
            ],
        },
    ]
}

/// Find a shipped spread by id.
pub fn find_spread(id: &str) -> CoreResult<SpreadDefinition> {
    shipped_spreads()
        .into_iter()
        .find(|s| s.id == id)
        .ok_or_else(|| CoreError::UnknownSpread(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    #[test]
    fn shipped_spreads_are_consistent() {
        let catalog_len = Catalog::major_arcana().len();
        for spread in shipped_spreads() {
            assert_eq!(spread.positions.len(), spread.card_count, "{}", spread.id);
            spread.validate_against(catalog_len).unwrap();
        }
    }

    #[test]
    fn shipped_card_counts() {
        let counts: Vec<usize> = shipped_spreads().iter().map(|s| s.card_count).collect();
        assert_eq!(counts, vec![1, 3, 10]);
    }

    #[test]
    fn crossing_card_is_rotated() {
        let celtic = find_spread("celtic_cross").unwrap();
        assert_eq!(celtic.positions[1].rotation, Some(90.0));
        assert_eq!(celtic.positions[0].rotation, None);
    }

    #[test]
    fn unknown_spread() {
        assert_eq!(
            find_spread("horseshoe"),
            Err(CoreError::UnknownSpread("horseshoe".to_string()))
        );
    }

    #[test]
    fn mismatched_positions_rejected() {
        let mut spread = find_spread("three_card").unwrap();
        spread.positions.pop();
        assert!(matches!(
            spread.validate(),
            Err(CoreError::PositionCountMismatch { positions: 2, .. })
        ));
    }

    #[test]
    fn oversized_spread_rejected() {
        let spread = find_spread("celtic_cross").unwrap();
        assert_eq!(
            spread.validate_against(5),
            Err(CoreError::SpreadExceedsCatalog {
                requested: 10,
                available: 5
            })
        );
    }

    #[test]
    fn empty_spread_rejected() {
        let mut spread = find_spread("single").unwrap();
        spread.card_count = 0;
        spread.positions.clear();
        assert!(matches!(spread.validate(), Err(CoreError::EmptySpread(_))));
    }
}
