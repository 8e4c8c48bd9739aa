//! The batched compute interface: one pre-allocated, struct-of-arrays
//! region that moves all per-frame data across the host boundary.

pub mod buffer;

pub use buffer::{
    InteropBuffer, CANDIDATE_CAPACITY, CMD_BEAT, CMD_DT, CMD_FACING_X, CMD_FACING_Z, CMD_MOVE_X,
    CMD_MOVE_Z, COMMAND_SLOTS, EVENT_CAPACITY, FLAG_ATTACH, FLAG_DASH, FLAG_DETACH, FLAG_JUMP,
    RESULT_SLOTS, RES_GROUNDED_TICKS, RES_MODE, RES_POS_X, RES_POS_Y, RES_POS_Z,
    RES_TETHER_ACTIVE, RES_TETHER_ANCHOR_X, RES_TETHER_ANCHOR_Y, RES_TETHER_ANCHOR_Z,
    RES_TETHER_ANGLE, RES_TETHER_ANGVEL, RES_TETHER_LENGTH, RES_VEL_X, RES_VEL_Y, RES_VEL_Z,
    SNAPSHOT_CAPACITY,
};
