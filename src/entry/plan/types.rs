use crate::config::RunConfig;

pub(in crate::entry) struct RunPlan {
    pub(super) config: RunConfig,
    pub(super) yes: bool,
    pub(super) no_color: bool,
}
