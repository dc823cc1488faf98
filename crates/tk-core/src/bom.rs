//! Bill of materials
//!
//! One line per member kind: the grid members, then the free members when
//! there are any. Formatting of the part number and spec string is what the
//! BOM service expects.

use serde::{Deserialize, Serialize};

use crate::model::{ArrayModel, ProfileParams};

/// A single BOM line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BomItem {
    pub part_no: String,
    pub name: String,
    pub spec: String,
    pub qty: usize,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

impl BomItem {
    fn square_tube(profile: &ProfileParams, suffix: &str, qty: usize) -> Self {
        let (w, h, t, l) = (profile.width, profile.height, profile.thickness, profile.length);
        Self {
            part_no: format!("ST-{w}x{h}x{t}{suffix}"),
            name: "Square tube".to_string(),
            spec: format!("{w}×{h}×t{t}×L{l}"),
            qty,
            unit: "pcs".to_string(),
            remark: Some(profile.material.clone()),
        }
    }
}

/// BOM lines for the current layout. Deleted members are not counted.
pub fn bom_items(model: &ArrayModel) -> Vec<BomItem> {
    let mut items = vec![BomItem::square_tube(&model.profile, "", model.active_count())];
    let free = model.free_members().len();
    if free > 0 {
        items.push(BomItem::square_tube(&model.profile, "-F", free));
    }
    items
}

/// Split into pages of at most `page_size` lines (at least one per page)
pub fn paginate(items: &[BomItem], page_size: usize) -> Vec<Vec<BomItem>> {
    items.chunks(page_size.max(1)).map(<[BomItem]>::to_vec).collect()
}
