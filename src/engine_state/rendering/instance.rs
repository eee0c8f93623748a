//! Instance data for instanced block rendering.
//!
//! Every visible block contributes one `InstanceRaw` to the instance list of its
//! block type within its chunk. The rendering collaborator draws each list as a
//! single instanced unit cube with the block type's material.

use cgmath::Point3;

/// One render instance: the world-space position of a unit cube.
///
/// # Memory Layout
/// - Position: 3x f32 (12 bytes)
///
/// Total size: 12 bytes, tightly packed so a slice of instances can be uploaded
/// as-is with `bytemuck::cast_slice`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    /// Minimum corner of the cube in world space
    pub position: [f32; 3],
}

impl InstanceRaw {
    /// Size of one instance in bytes, as laid out in an instance buffer.
    pub const STRIDE: usize = std::mem::size_of::<InstanceRaw>();

    /// Creates the instance for the block at a world position.
    pub fn new(position: Point3<i32>) -> Self {
        InstanceRaw {
            position: [position.x as f32, position.y as f32, position.z as f32],
        }
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Point3;

    use super::InstanceRaw;

    #[test]
    fn instances_pack_to_twelve_bytes() {
        assert_eq!(InstanceRaw::STRIDE, 12);
        let instances = [
            InstanceRaw::new(Point3::new(1, 2, 3)),
            InstanceRaw::new(Point3::new(-4, 0, 64)),
        ];
        let bytes: &[u8] = bytemuck::cast_slice(&instances);
        assert_eq!(bytes.len(), 24);
    }

    #[test]
    fn positions_are_converted_exactly() {
        let instance = InstanceRaw::new(Point3::new(-33, 7, 1024));
        assert_eq!(instance.position, [-33.0, 7.0, 1024.0]);
    }
}
