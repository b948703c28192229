use thiserror::Error;
use wg_core::{EntityId, WorldId};

#[derive(Debug, Error)]
pub enum WorldError {
    #[error("world {0} is not loaded")]
    UnknownWorld(WorldId),

    #[error("entity {0} does not exist")]
    UnknownEntity(EntityId),

    #[error("chunk ({cx}, {cz}) of {world} is not loaded")]
    ChunkNotLoaded { world: WorldId, cx: i32, cz: i32 },

    #[error("y={y} is outside the build height of {world}")]
    OutOfBounds { world: WorldId, y: i32 },

    #[error("entity {0} is carrying passengers")]
    HasPassengers(EntityId),

    #[error("entity {0} cannot be leashed")]
    NotLeashable(EntityId),

    #[error("entity {0} is dead")]
    Dead(EntityId),

    #[error("entity {0} cannot be attached to itself")]
    SelfReference(EntityId),
}

pub type WorldResult<T> = Result<T, WorldError>;
