//! GPU 侧模型
//!
//! `ModelData` 上传后的结果：每个网格一对顶点/索引缓冲，每个材质一个 bind group。

use std::collections::HashMap;
use std::path::PathBuf;

use bytemuck::{Pod, Zeroable};
use tracing::debug;
use wgpu::util::DeviceExt;

use super::texture::create_rgba_texture;
use crate::geometry::{MaterialData, ModelData};

/// 材质 Uniform，与着色器中的 `Material` 对应
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub(crate) struct MaterialUniform {
    base_color: [f32; 4],
    flags: [u32; 4],
}

impl MaterialUniform {
    pub(crate) fn new(base_color: [f32; 4], has_texture: bool) -> Self {
        Self {
            base_color,
            flags: [has_texture as u32, 0, 0, 0],
        }
    }
}

/// 上传所需的共享资源
pub(crate) struct MaterialResources<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub layout: &'a wgpu::BindGroupLayout,
    pub sampler: &'a wgpu::Sampler,
    pub white_view: &'a wgpu::TextureView,
}

/// GPU 网格
pub struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    /// 指向 `GpuModel::materials`
    material: usize,
}

/// GPU 材质
pub struct GpuMaterial {
    bind_group: wgpu::BindGroup,
    _uniform: wgpu::Buffer,
}

/// GPU 模型
pub struct GpuModel {
    meshes: Vec<GpuMesh>,
    /// 最后一个元素是默认材质
    materials: Vec<GpuMaterial>,
    _textures: Vec<wgpu::Texture>,
}

impl GpuModel {
    pub(crate) fn upload(model: &ModelData, resources: &MaterialResources<'_>) -> Self {
        debug!(model = %model.name, "Uploading model to GPU");

        let mut textures = Vec::new();
        let mut views: Vec<wgpu::TextureView> = Vec::new();
        let mut view_index: HashMap<PathBuf, usize> = HashMap::new();

        let default = MaterialData::default();
        let all_materials: Vec<&MaterialData> =
            model.materials.iter().chain(std::iter::once(&default)).collect();

        // 同一贴图只上传一次
        let material_views: Vec<Option<usize>> = all_materials
            .iter()
            .map(|material| {
                let texture = material.diffuse_texture.as_ref()?;
                let index = *view_index.entry(texture.source.clone()).or_insert_with(|| {
                    let label = texture.source.display().to_string();
                    let gpu_texture =
                        create_rgba_texture(resources.device, resources.queue, &texture.image, &label);
                    views.push(gpu_texture.create_view(&wgpu::TextureViewDescriptor::default()));
                    textures.push(gpu_texture);
                    views.len() - 1
                });
                Some(index)
            })
            .collect();

        let materials: Vec<GpuMaterial> = all_materials
            .iter()
            .zip(&material_views)
            .map(|(material, view)| create_material(material, view.map(|i| &views[i]), resources))
            .collect();

        let default_material = materials.len() - 1;
        let meshes = model
            .meshes
            .iter()
            .map(|mesh| {
                let vertex_buffer = resources.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{} Vertex Buffer", mesh.name)),
                    contents: bytemuck::cast_slice(&mesh.vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                });
                let index_buffer = resources.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{} Index Buffer", mesh.name)),
                    contents: bytemuck::cast_slice(&mesh.indices),
                    usage: wgpu::BufferUsages::INDEX,
                });

                GpuMesh {
                    vertex_buffer,
                    index_buffer,
                    index_count: mesh.indices.len() as u32,
                    material: mesh.material_index.unwrap_or(default_material),
                }
            })
            .collect();

        Self {
            meshes,
            materials,
            _textures: textures,
        }
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// 绘制所有网格（帧 bind group 由调用者设置在 group 0）
    pub fn draw<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        for mesh in &self.meshes {
            let material = self
                .materials
                .get(mesh.material)
                .or_else(|| self.materials.last());
            let Some(material) = material else {
                continue;
            };

            pass.set_bind_group(1, &material.bind_group, &[]);
            pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }
    }
}

fn create_material(
    material: &MaterialData,
    texture_view: Option<&wgpu::TextureView>,
    resources: &MaterialResources<'_>,
) -> GpuMaterial {
    let uniform = MaterialUniform::new(material.base_color, texture_view.is_some());
    let buffer = resources.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{} Material Uniform", material.name)),
        contents: bytemuck::bytes_of(&uniform),
        usage: wgpu::BufferUsages::UNIFORM,
    });

    let bind_group = resources.device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(&format!("{} Material Bind Group", material.name)),
        layout: resources.layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(texture_view.unwrap_or(resources.white_view)),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(resources.sampler),
            },
        ],
    });

    GpuMaterial {
        bind_group,
        _uniform: buffer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_uniform_layout() {
        assert_eq!(std::mem::size_of::<MaterialUniform>(), 32);
        let uniform = MaterialUniform::new([0.5, 0.5, 0.5, 1.0], true);
        assert_eq!(uniform.flags[0], 1);
    }
}
