use crate::core::CascadeError;

/// Why a swap attempt was refused. Nothing is mutated when this is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SwapRejected {
    #[error("board is locked while a cascade resolves")]
    Locked,
    #[error("battle stopped after an unrecoverable cascade failure")]
    Faulted,
    #[error("swap endpoint is off the board")]
    OutOfBounds,
    #[error("swap endpoints are not adjacent")]
    NotAdjacent,
    #[error("it is not the player's turn")]
    NotPlayerTurn,
    #[error("no moves left this turn")]
    NoMovesLeft,
}

impl SwapRejected {
    pub fn code(self) -> &'static str {
        match self {
            SwapRejected::Locked => "locked",
            SwapRejected::Faulted => "faulted",
            SwapRejected::OutOfBounds | SwapRejected::NotAdjacent => "invalid_swap",
            SwapRejected::NotPlayerTurn | SwapRejected::NoMovesLeft => "no_move",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BattleError {
    #[error(transparent)]
    Rejected(#[from] SwapRejected),
    #[error(transparent)]
    Cascade(#[from] CascadeError),
}

impl BattleError {
    /// A rejected swap is routine; a cascade failure is a defect.
    pub fn is_rejection(&self) -> bool {
        matches!(self, BattleError::Rejected(_))
    }
}
