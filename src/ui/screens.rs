use crate::filter::LeadFilter;
use crate::models::Lead;
use crate::snapshot::Snapshot;

/// Filter inputs plus a cursor over the filtered rows. Used by both the list
/// and the edit/delete screens; a new browser is the screen's initial state.
#[derive(Default, Clone, Debug)]
pub(crate) struct LeadBrowser {
    pub(crate) filter: LeadFilter,
    pub(crate) selected: usize,
}

impl LeadBrowser {
    /// Leads passing the filter, recomputed against the current snapshot.
    pub(crate) fn matches<'a>(&self, snapshot: &'a Snapshot) -> Vec<&'a Lead> {
        self.filter.apply(snapshot.current())
    }

    /// Selected lead, clamped to the current match list.
    pub(crate) fn selected_lead<'a>(&self, snapshot: &'a Snapshot) -> Option<&'a Lead> {
        let matches = self.matches(snapshot);
        let idx = self.selected.min(matches.len().saturating_sub(1));
        matches.get(idx).copied()
    }

    pub(crate) fn selected_index(&self, match_count: usize) -> usize {
        self.selected.min(match_count.saturating_sub(1))
    }

    pub(crate) fn push_query_char(&mut self, ch: char) {
        if !ch.is_control() {
            self.filter.owner_query.push(ch);
            self.selected = 0;
        }
    }

    pub(crate) fn pop_query_char(&mut self) {
        self.filter.owner_query.pop();
        self.selected = 0;
    }

    pub(crate) fn cycle_category(&mut self, snapshot: &Snapshot, offset: isize) {
        self.filter.cycle_category(&snapshot.categories(), offset);
        self.selected = 0;
    }

    pub(crate) fn move_selection(&mut self, offset: isize, match_count: usize) {
        if match_count == 0 {
            self.selected = 0;
            return;
        }
        let current = self.selected_index(match_count) as isize;
        let next = (current + offset).clamp(0, match_count as isize - 1);
        self.selected = next as usize;
    }
}
