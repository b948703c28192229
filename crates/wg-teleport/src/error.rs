use thiserror::Error;
use wg_core::{EntityId, WorldId};
use wg_world::WorldError;

#[derive(Debug, Error)]
pub enum TeleportError {
    #[error("no anchor named {0:?}")]
    AnchorNotFound(String),

    #[error("you do not have permission to do that")]
    PermissionDenied,

    #[error("anchor {0:?} is private")]
    PrivateAnchor(String),

    #[error("teleport is cooling down, {remaining_secs}s left")]
    CoolingDown { remaining_secs: u64 },

    #[error("need {required} {item} but only have {held}")]
    InsufficientResource {
        item:     String,
        required: u32,
        held:     u32,
    },

    #[error("teleporting to {target} from another world is disabled")]
    CrossWorldDisabled { target: String },

    #[error("destination world {0} is not loaded")]
    WorldNotFound(WorldId),

    #[error("anchor limit of {limit} reached")]
    AnchorLimitReached { limit: u32 },

    #[error("cannot teleport while riding a boat")]
    RidingBoat,

    #[error("entity {0} cannot teleport right now")]
    SubjectUnavailable(EntityId),

    #[error("world error: {0}")]
    World(#[from] WorldError),
}

impl TeleportError {
    /// `true` for errors the requester caused and should be told about, as
    /// opposed to internal failures.
    pub fn is_validation(&self) -> bool {
        !matches!(self, TeleportError::World(_))
    }
}

pub type TeleportResult<T> = Result<T, TeleportError>;
