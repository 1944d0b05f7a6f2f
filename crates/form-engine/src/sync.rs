//! Keeps the two renderings of a rubric grid (table and stacked panels) in agreement.
//!
//! Both views hold the selected column of every rubric sub-question. A change always enters
//! through [`RubricViews::select`], which writes the view the respondent touched and then mirrors
//! the value into the other one. Each mirror step compares before writing, so a view that already
//! agrees is left alone and nothing echoes back.

use std::collections::BTreeMap;

use form_spec::RespondentSlot;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RubricView {
    Desktop,
    Mobile,
}

impl RubricView {
    pub fn other(self) -> Self {
        match self {
            RubricView::Desktop => RubricView::Mobile,
            RubricView::Mobile => RubricView::Desktop,
        }
    }
}

/// One write that actually changed a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ViewChange {
    pub view: RubricView,
    pub slot: RespondentSlot,
    pub column: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RubricViews {
    desktop: BTreeMap<RespondentSlot, usize>,
    mobile: BTreeMap<RespondentSlot, usize>,
}

impl RubricViews {
    pub fn new() -> Self {
        Self::default()
    }

    fn view(&self, view: RubricView) -> &BTreeMap<RespondentSlot, usize> {
        match view {
            RubricView::Desktop => &self.desktop,
            RubricView::Mobile => &self.mobile,
        }
    }

    fn view_mut(&mut self, view: RubricView) -> &mut BTreeMap<RespondentSlot, usize> {
        match view {
            RubricView::Desktop => &mut self.desktop,
            RubricView::Mobile => &mut self.mobile,
        }
    }

    pub fn selected(&self, view: RubricView, slot: &RespondentSlot) -> Option<usize> {
        self.view(view).get(slot).copied()
    }

    pub fn in_sync(&self) -> bool {
        self.desktop == self.mobile
    }

    fn sync_into(
        &mut self,
        view: RubricView,
        slot: RespondentSlot,
        column: Option<usize>,
    ) -> Option<ViewChange> {
        if self.selected(view, &slot) == column {
            return None;
        }
        let cells = self.view_mut(view);
        match column {
            Some(column) => {
                cells.insert(slot, column);
            }
            None => {
                cells.remove(&slot);
            }
        }
        Some(ViewChange { view, slot, column })
    }

    /// Applies a selection made in `origin` to both views. Returns only the writes that changed
    /// something; a repeated call returns nothing.
    pub fn select(
        &mut self,
        origin: RubricView,
        slot: RespondentSlot,
        column: Option<usize>,
    ) -> Vec<ViewChange> {
        [origin, origin.other()]
            .into_iter()
            .filter_map(|view| self.sync_into(view, slot, column))
            .collect()
    }

    /// A click on a cell: selects the column, or clears it when it was already selected.
    pub fn click(
        &mut self,
        origin: RubricView,
        slot: RespondentSlot,
        column: usize,
    ) -> Vec<ViewChange> {
        let next = if self.selected(origin, &slot) == Some(column) {
            None
        } else {
            Some(column)
        };
        self.select(origin, slot, next)
    }
}
