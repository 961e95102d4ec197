//! Typed vectors and matrices.

mod matrix;
mod transform;
mod vector;

pub use matrix::Matrix;
pub use transform::Transform;
pub use vector::{
    Vector, Vector2, Vector3, Vector4, VectorN, byte2, byte3, byte4, float2, float3, float4, int2,
    int3, int4, short2, short3, short4, ubyte2, ubyte3, ubyte4, uint2, uint3, uint4, ushort2,
    ushort3, ushort4,
};
