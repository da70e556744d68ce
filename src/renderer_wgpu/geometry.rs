use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Clone, Copy, Debug, Zeroable, Pod)]
pub struct Vertex {
    pub position: [f32; 3],
}

impl Vertex {
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 1] = [wgpu::VertexAttribute {
            offset: 0,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x3,
        }];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

pub struct CpuMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

/// Unit cube centred on the origin, faces wound inward.
pub fn sky_cube() -> CpuMesh {
    let corners = [
        [-0.5, -0.5, -0.5],
        [0.5, -0.5, -0.5],
        [0.5, 0.5, -0.5],
        [-0.5, 0.5, -0.5],
        [-0.5, -0.5, 0.5],
        [0.5, -0.5, 0.5],
        [0.5, 0.5, 0.5],
        [-0.5, 0.5, 0.5],
    ];
    let vertices = corners.iter().map(|&position| Vertex { position }).collect();

    #[rustfmt::skip]
    let indices = vec![
        0, 1, 2, 0, 2, 3, // -z
        5, 4, 7, 5, 7, 6, // +z
        4, 0, 3, 4, 3, 7, // -x
        1, 5, 6, 1, 6, 2, // +x
        3, 2, 6, 3, 6, 7, // +y
        4, 5, 1, 4, 1, 0, // -y
    ];

    CpuMesh { vertices, indices }
}

/// Square plane of side `size` lying in XZ at y = 0, facing +Y.
pub fn water_plane(size: f32) -> CpuMesh {
    let h = size * 0.5;
    let vertices = vec![
        Vertex { position: [-h, 0.0, -h] },
        Vertex { position: [h, 0.0, -h] },
        Vertex { position: [h, 0.0, h] },
        Vertex { position: [-h, 0.0, h] },
    ];
    CpuMesh {
        vertices,
        indices: vec![0, 2, 1, 0, 3, 2],
    }
}

pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl GpuMesh {
    pub fn upload(device: &wgpu::Device, mesh: &CpuMesh, label: &str) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-vertex-buffer")),
            contents: bytemuck::cast_slice(mesh.vertices.as_slice()),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-index-buffer")),
            contents: bytemuck::cast_slice(mesh.indices.as_slice()),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        }
    }

    pub fn draw<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sky_cube_indices_are_in_range() {
        let mesh = sky_cube();
        assert_eq!(mesh.indices.len(), 36);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
    }

    #[test]
    fn water_plane_spans_requested_size_at_sea_level() {
        let mesh = water_plane(1000.0);
        let xs: Vec<f32> = mesh.vertices.iter().map(|v| v.position[0]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), -500.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 500.0);
        assert!(mesh.vertices.iter().all(|v| v.position[1] == 0.0));
    }

    #[test]
    fn water_plane_faces_up() {
        let mesh = water_plane(2.0);
        let p = |i: u32| glam::Vec3::from(mesh.vertices[i as usize].position);
        for tri in mesh.indices.chunks(3) {
            let normal = (p(tri[1]) - p(tri[0])).cross(p(tri[2]) - p(tri[0]));
            assert!(normal.y > 0.0);
        }
    }
}
