use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::pack::delta::DeltaInstruction;
use bytes::Bytes;

/// One parsed pack entry
///
/// Undeltified entries carry their full content; deltified entries name a
/// base object elsewhere in the same pack and describe how to rebuild the
/// target from it.
#[derive(Debug, Clone)]
pub enum PackObject {
    Undeltified {
        object_type: ObjectType,
        content: Bytes,
    },
    Deltified {
        base_oid: ObjectId,
        target_size: usize,
        instructions: Vec<DeltaInstruction>,
    },
}
