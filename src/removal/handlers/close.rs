//! Close tabs, possibly destroying their groups.

use super::{ActionContext, FlowHandler, FlowKind};
use crate::removal::host::{ClosureTarget, DestroyedGroups, TabClosureParams, TabHost};
use crate::tab::TabId;

#[derive(Debug, Clone)]
pub struct CloseTabsHandler {
    params: TabClosureParams,
    placeholders: Vec<TabId>,
}

impl CloseTabsHandler {
    pub fn new(params: TabClosureParams) -> Self {
        Self {
            params,
            placeholders: Vec::new(),
        }
    }

    pub fn params(&self) -> &TabClosureParams {
        &self.params
    }

    pub fn placeholders(&self) -> &[TabId] {
        &self.placeholders
    }

    fn requested_tabs(&self, host: &dyn TabHost) -> Vec<TabId> {
        let tabs = match &self.params.target {
            ClosureTarget::Tabs(tabs) => tabs.clone(),
            ClosureTarget::All => host.live_tab_ids(),
        };
        tabs.into_iter()
            .filter(|&id| !host.is_tab_closing(id))
            .collect()
    }

    /// Parameters adjusted to the host's current state and the dialog answer.
    /// `None` when there is nothing left to close.
    fn sanitized_params(&self, host: &dyn TabHost, ctx: &ActionContext) -> Option<TabClosureParams> {
        let mut params = self.params.clone();
        let has_placeholders = !self.placeholders.is_empty();

        params.target = match &self.params.target {
            ClosureTarget::Tabs(_) => ClosureTarget::Tabs(self.requested_tabs(host)),
            ClosureTarget::All if has_placeholders => ClosureTarget::Tabs(
                host.live_tab_ids()
                    .into_iter()
                    .filter(|&id| !host.is_placeholder(id) && !host.is_tab_closing(id))
                    .collect(),
            ),
            ClosureTarget::All => ClosureTarget::All,
        };

        // Closing everything but the placeholders does not end the window.
        if has_placeholders {
            params.upon_exit = false;
        }
        if ctx.user_confirmed() {
            params.allow_undo = false;
        }

        let empty = match &params.target {
            ClosureTarget::Tabs(tabs) => tabs.is_empty(),
            ClosureTarget::All => host.live_tab_ids().is_empty(),
        };
        (!empty).then_some(params)
    }
}

impl FlowHandler for CloseTabsHandler {
    fn kind(&self) -> FlowKind {
        FlowKind::Close
    }

    fn groups_destroyed(&self, host: &dyn TabHost) -> DestroyedGroups {
        host.groups_destroyed_by(&self.requested_tabs(host))
    }

    fn placeholders_created(&mut self, placeholders: Vec<TabId>) {
        self.placeholders = placeholders;
    }

    fn perform_action(&mut self, host: &mut dyn TabHost, ctx: &ActionContext) {
        let Some(params) = self.sanitized_params(host, ctx) else {
            log::debug!("Close flow has no tabs left to close");
            return;
        };
        let closed = host.close_tabs(params);
        log::info!("Close flow closed tabs {:?}", closed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TabModel;
    use crate::removal::dialogs::ConfirmationResult;
    use crate::tab::GroupKind;

    fn model_with_tabs(count: usize) -> TabModel {
        let mut model = TabModel::new(false);
        for _ in 0..count {
            model.create_tab(None, None);
        }
        model
    }

    #[test]
    fn drops_tabs_already_closing() {
        let mut model = model_with_tabs(3);
        model.close_tabs(TabClosureParams::close_tabs(vec![1]));

        let mut handler = CloseTabsHandler::new(TabClosureParams::close_tabs(vec![1, 2]));
        handler.perform_action(&mut model, &ActionContext::default());

        assert_eq!(model.live_ids(), vec![3]);
        assert_eq!(model.ledger().event_count(), 2);
        assert_eq!(model.ledger().pending_ids(), vec![1, 2]);
    }

    #[test]
    fn nothing_left_performs_no_action() {
        let mut model = model_with_tabs(2);
        model.close_tabs(TabClosureParams::close_tabs(vec![1]));

        let mut handler = CloseTabsHandler::new(TabClosureParams::close_tabs(vec![1]));
        handler.perform_action(&mut model, &ActionContext::default());
        assert_eq!(model.ledger().event_count(), 1);
    }

    #[test]
    fn close_all_spares_placeholders() {
        let mut model = TabModel::new(false);
        let group = model.add_group("Shared", GroupKind::Sync);
        model.create_tab(Some("a"), Some(group));
        model.create_tab(Some("b"), None);
        let placeholder = model.add_placeholder_tab(&group).unwrap();

        let mut handler =
            CloseTabsHandler::new(TabClosureParams::close_all().with_upon_exit(true));
        handler.placeholders_created(vec![placeholder]);
        let params = handler
            .sanitized_params(&model, &ActionContext::default())
            .unwrap();

        assert_eq!(params.target, ClosureTarget::Tabs(vec![1, 2]));
        assert!(!params.upon_exit);
        assert!(params.allow_undo);
    }

    #[test]
    fn confirmed_dialog_disables_undo() {
        let model = model_with_tabs(1);
        let handler = CloseTabsHandler::new(TabClosureParams::close_tabs(vec![1]));

        let confirmed = ActionContext::after_dialog(ConfirmationResult::ConfirmedDelete);
        assert!(!handler.sanitized_params(&model, &confirmed).unwrap().allow_undo);

        let immediate = ActionContext::after_dialog(ConfirmationResult::Immediate);
        assert!(handler.sanitized_params(&model, &immediate).unwrap().allow_undo);
    }
}
