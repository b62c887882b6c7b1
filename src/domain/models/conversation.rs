#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
pub enum ConversationState {
    #[default]
    Entry,
    ConfigLanguage,
    ConfigDifficulty,
    ConfigModel,
    ConfigSolver,
    ContinueGetId,
    Playing,
}
