//! The Major Arcana catalog.
//!
//! The table is static and loaded once; a [`Catalog`] owns an immutable copy
//! that the draw engine samples from.

use crate::card::Archetype;
use crate::error::{CoreError, CoreResult};

/// `(id, name, localized name, theme, upright meaning, reversed meaning)`.
pub type ArchetypeRow = (u32, &'static str, &'static str, &'static str, &'static str, &'static str);

/// The 22 Major Arcana.
#[rustfmt::skip]
pub const MAJOR_ARCANA: &[ArchetypeRow] = &[
    (0, "The Fool", "愚者", "新的开始", "新的开始、纯真、自发性", "鲁莽、冒险"),
    (1, "The Magician", "魔术师", "显化", "显化、足智多谋、力量", "操纵、计划不周"),
    (2, "The High Priestess", "女祭司", "直觉", "直觉、神圣知识、潜意识", "秘密、与直觉断联"),
    (3, "The Empress", "皇后", "丰饶", "女性特质、美丽、自然、养育", "创造力受阻、依赖"),
    (4, "The Emperor", "皇帝", "权威", "权威、体制、结构", "支配、过度控制"),
    (5, "The Hierophant", "教皇", "传统", "精神智慧、宗教信仰、从众", "个人信仰、自由、挑战现状"),
    (6, "The Lovers", "恋人", "爱", "爱、和谐、关系、价值观一致", "自爱、不和谐、失衡"),
    (7, "The Chariot", "战车", "意志力", "控制、意志力、成功、行动", "自律、反对、缺乏方向"),
    (8, "Strength", "力量", "勇气", "力量、勇气、说服力、影响力", "内在力量、自我怀疑、低能量"),
    (9, "The Hermit", "隐士", "内省", "灵魂探索、内省、独处", "孤立、孤独、退缩"),
    (10, "Wheel of Fortune", "命运之轮", "命运", "好运、业力、生命周期、命运", "厄运、抗拒改变"),
    (11, "Justice", "正义", "真相", "正义、公平、真相、因果", "不公、缺乏责任感"),
    (12, "The Hanged Man", "倒吊人", "臣服", "暂停、臣服、放手、新视角", "拖延、抗拒、停滞"),
    (13, "Death", "死神", "转化", "结束、改变、转化、过渡", "抗拒改变、个人转化"),
    (14, "Temperance", "节制", "平衡", "平衡、适度、耐心、目的", "失衡、过度、自我疗愈"),
    (15, "The Devil", "恶魔", "阴影", "阴影自我、依恋、成瘾、限制", "释放限制性信念、探索黑暗思想"),
    (16, "The Tower", "高塔", "剧变", "突然改变、动荡、混乱、启示", "个人转化、害怕改变"),
    (17, "The Star", "星星", "希望", "希望、信念、目的、更新、灵性", "缺乏信念、绝望、自我信任"),
    (18, "The Moon", "月亮", "幻觉", "幻觉、恐惧、焦虑、潜意识", "释放恐惧、压抑情绪"),
    (19, "The Sun", "太阳", "积极", "积极、乐趣、温暖、成功、活力", "内在小孩、情绪低落、过度乐观"),
    (20, "Judgement", "审判", "重生", "审判、重生、内在召唤、赦免", "自我怀疑、内在批评、忽视召唤"),
    (21, "The World", "世界", "圆满", "完成、整合、成就、旅行", "寻求个人了结、捷径、延误"),
];

/// An immutable set of distinct archetypes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    archetypes: Vec<Archetype>,
}

impl Catalog {
    /// The shipped Major Arcana catalog.
    pub fn major_arcana() -> Self {
        let archetypes = MAJOR_ARCANA
            .iter()
            .map(
                |&(id, name, name_localized, theme, upright, reversed)| Archetype {
                    id,
                    name: name.to_string(),
                    name_localized: name_localized.to_string(),
                    theme: theme.to_string(),
                    meaning_upright: upright.to_string(),
                    meaning_reversed: reversed.to_string(),
                },
            )
            .collect();
        Self { archetypes }
    }

    /// Build a catalog from arbitrary archetypes. Duplicate ids are rejected.
    pub fn from_archetypes(archetypes: Vec<Archetype>) -> CoreResult<Self> {
        let mut seen = std::collections::HashSet::new();
        for a in &archetypes {
            if !seen.insert(a.id) {
                return Err(CoreError::DuplicateArchetype(a.id));
            }
        }
        Ok(Self { archetypes })
    }

    /// All archetypes, in catalog order.
    pub fn as_slice(&self) -> &[Archetype] {
        &self.archetypes
    }

    /// Number of archetypes.
    pub fn len(&self) -> usize {
        self.archetypes.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.archetypes.is_empty()
    }

    /// Look up an archetype by id.
    pub fn get(&self, id: u32) -> Option<&Archetype> {
        self.archetypes.iter().find(|a| a.id == id)
    }

    /// Look up an archetype by canonical (case-insensitive) or localized name.
    pub fn find_by_name(&self, name: &str) -> Option<&Archetype> {
        let needle = name.trim();
        self.archetypes
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(needle) || a.name_localized == needle)
    }

    /// Resolve a numeric id or a name to an archetype.
    pub fn lookup(&self, query: &str) -> CoreResult<&Archetype> {
        let query = query.trim();
        let found = match query.parse::<u32>() {
            Ok(id) => self.get(id),
            Err(_) => self.find_by_name(query),
        };
        found.ok_or_else(|| CoreError::UnknownArchetype(query.to_string()))
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::major_arcana()
    }
}
