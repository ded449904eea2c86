use super::shift_clock::ShiftState;
use super::types::{RecipeId, ToolId};

/// Errors from shift phase transitions.
#[derive(Debug, Clone, PartialEq)]
pub enum ShiftError {
    /// The requested transition is not legal from the current state.
    InvalidTransition { from: ShiftState, requested: ShiftState },
}

impl std::fmt::Display for ShiftError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShiftError::InvalidTransition { from, requested } => {
                write!(f, "Cannot transition from {} to {}", from, requested)
            }
        }
    }
}

impl std::error::Error for ShiftError {}

/// Errors from the cooking pipeline operations.
#[derive(Debug, Clone, PartialEq)]
pub enum CookingError {
    /// A cooking session is already active; only one runs at a time.
    SessionActive,
    /// No recipe is registered under the given id.
    UnknownRecipe(RecipeId),
    /// The ingredient check failed before any deduction.
    MissingIngredients(RecipeId),
    /// The operation requires an active session and none exists.
    NoActiveSession,
    /// The tool does not match the current step's requirement.
    WrongTool { expected: ToolId, got: ToolId },
    /// The tool is still cooling down from a previous use.
    ToolCoolingDown(ToolId),
    /// No tool is registered under the given id.
    UnknownTool(ToolId),
    /// The tool exists but is not owned by the stall.
    ToolNotOwned(ToolId),
}

impl std::fmt::Display for CookingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CookingError::SessionActive => {
                write!(f, "A cooking session is already active")
            }
            CookingError::UnknownRecipe(id) => write!(f, "Unknown recipe '{}'", id),
            CookingError::MissingIngredients(id) => {
                write!(f, "Insufficient ingredients for recipe '{}'", id)
            }
            CookingError::NoActiveSession => write!(f, "No active cooking session"),
            CookingError::WrongTool { expected, got } => {
                write!(f, "Step requires tool '{}', got '{}'", expected, got)
            }
            CookingError::ToolCoolingDown(id) => write!(f, "Tool '{}' is cooling down", id),
            CookingError::UnknownTool(id) => write!(f, "Unknown tool '{}'", id),
            CookingError::ToolNotOwned(id) => write!(f, "Tool '{}' is not owned", id),
        }
    }
}

impl std::error::Error for CookingError {}

/// Errors from serving a stored dish to a displayed customer.
#[derive(Debug, Clone, PartialEq)]
pub enum ServeError {
    /// The slot index is out of bounds of the displayed set.
    InvalidSlot(usize),
    /// The customer in that slot is not in the Waiting state.
    NotAwaitingService,
    /// Dish storage is empty; nothing to serve.
    NoDishReady,
    /// The dish's recipe does not match the customer's order.
    /// The dish has been returned to storage unconsumed.
    WrongRecipe { wanted: RecipeId, offered: RecipeId },
    /// The order references a recipe the book does not know.
    /// A configuration fault; cannot happen with a pool-built queue.
    UnknownRecipe(RecipeId),
}

impl std::fmt::Display for ServeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServeError::InvalidSlot(slot) => write!(f, "Invalid display slot {}", slot),
            ServeError::NotAwaitingService => {
                write!(f, "Customer is not awaiting service")
            }
            ServeError::NoDishReady => write!(f, "No dish ready in storage"),
            ServeError::WrongRecipe { wanted, offered } => {
                write!(f, "Order wants recipe '{}', dish is '{}'", wanted, offered)
            }
            ServeError::UnknownRecipe(id) => write!(f, "Order references unknown recipe '{}'", id),
        }
    }
}

impl std::error::Error for ServeError {}
