//! Wire encoding for replication packets

pub mod byte_buffer;
pub mod codec;
pub mod movement_block;
pub mod phase_shift;
pub mod update_data;
pub mod visibility_flags;

pub use byte_buffer::ByteBuffer;
pub use codec::{CodecContext, CodecError, UpdateType};
pub use update_data::UpdateData;
