use std::io::{BufReader, Cursor};

use crate::{
    data_structures::{model::ModelVertex, texture::Texture},
    resources::{primitives::MeshData, texture::load_binary},
};

/**
 * This module contains all logic for loading meshes/textures from external
 * files and for generating the procedural primitives of the carousel.
 */
pub mod primitives;
pub mod texture;

/// Geometry and base colour texture extracted from a glTF file.
pub struct GltfPrimitive {
    pub geometry: MeshData,
    pub base_color: Option<Texture>,
}

/// Load the first mesh primitive of a glTF (.glb/.gltf) file.
///
/// The showcase only needs one geometry/material pair out of the file, the
/// way a viewer grabs the first mesh it can find, so scene hierarchy,
/// animations and any further primitives are ignored.
pub async fn load_gltf_primitive(
    file_name: &str,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> anyhow::Result<GltfPrimitive> {
    let gltf_bytes = load_binary(file_name).await?;
    let gltf_cursor = Cursor::new(gltf_bytes);
    let gltf_reader = BufReader::new(gltf_cursor);
    let gltf = gltf::Gltf::from_reader(gltf_reader)?;

    // Load buffers
    let mut buffer_data = Vec::new();
    for buffer in gltf.buffers() {
        match buffer.source() {
            gltf::buffer::Source::Bin => {
                if let Some(blob) = gltf.blob.as_deref() {
                    buffer_data.push(blob.into());
                };
            }
            gltf::buffer::Source::Uri(uri) => {
                let bin = load_binary(uri).await?;
                buffer_data.push(bin);
            }
        }
    }

    let primitive = gltf
        .meshes()
        .flat_map(|mesh| mesh.primitives())
        .next()
        .ok_or_else(|| anyhow::anyhow!("{file_name} contains no mesh primitive"))?;

    let reader = primitive.reader(|buffer| Some(&buffer_data[buffer.index()]));

    let mut vertices = Vec::new();
    if let Some(positions) = reader.read_positions() {
        positions.for_each(|position| {
            vertices.push(ModelVertex {
                position,
                tex_coords: Default::default(),
                normal: Default::default(),
            })
        });
    }
    if let Some(normals) = reader.read_normals() {
        for (index, normal) in normals.enumerate() {
            vertices[index].normal = normal;
        }
    }
    if let Some(tex_coords) = reader.read_tex_coords(0).map(|tc| tc.into_f32()) {
        for (index, tex_coord) in tex_coords.enumerate() {
            vertices[index].tex_coords = tex_coord;
        }
    }

    let mut indices = Vec::new();
    if let Some(indices_raw) = reader.read_indices() {
        indices.append(&mut indices_raw.into_u32().collect::<Vec<u32>>());
    }

    let base_color = load_base_color(&primitive, &buffer_data, file_name, device, queue)
        .await
        .unwrap_or_else(|e| {
            log::warn!("No base colour texture in {file_name}: {e}");
            None
        });

    Ok(GltfPrimitive {
        geometry: MeshData { vertices, indices },
        base_color,
    })
}

async fn load_base_color(
    primitive: &gltf::Primitive<'_>,
    buffer_data: &[Vec<u8>],
    file_name: &str,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> anyhow::Result<Option<Texture>> {
    let pbr = primitive.material().pbr_metallic_roughness();
    let Some(info) = pbr.base_color_texture() else {
        return Ok(None);
    };
    let texture = match info.texture().source().source() {
        gltf::image::Source::View { view, mime_type } => Texture::from_bytes(
            device,
            queue,
            &buffer_data[view.buffer().index()]
                [view.offset()..view.offset() + view.length()],
            file_name,
            mime_type.split('/').next_back(),
            false,
        )?,
        gltf::image::Source::Uri { uri, mime_type } => {
            let bytes = load_binary(uri).await?;
            Texture::from_bytes(
                device,
                queue,
                &bytes,
                file_name,
                mime_type.and_then(|mt| mt.split('/').next_back()),
                false,
            )?
        }
    };
    Ok(Some(texture))
}
