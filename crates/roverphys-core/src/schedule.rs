/// Per-vehicle tick state machine.
///
/// `Idle -> PreStep -> Stepped -> PostStep -> Idle`, strictly in that order.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum TickPhase {
    #[default]
    Idle = 0,
    /// Torques computed and forces handed to the backend.
    PreStep = 1,
    /// Backend has integrated; state not read back yet.
    Stepped = 2,
    /// State extracted, derived quantities being refreshed.
    PostStep = 3,
}

impl TickPhase {
    /// The phase that must follow `self`.
    pub fn successor(self) -> TickPhase {
        match self {
            TickPhase::Idle => TickPhase::PreStep,
            TickPhase::PreStep => TickPhase::Stepped,
            TickPhase::Stepped => TickPhase::PostStep,
            TickPhase::PostStep => TickPhase::Idle,
        }
    }
}
