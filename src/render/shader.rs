//! WGSL for the instanced quad pipeline.
//!
//! One instance per [`Quad`](super::Quad): the vertex stage expands six
//! corners into the quad's rectangle, the fragment stage discards outside the
//! inscribed disc for disc-shaped quads.

/// Instanced quad shader (`vs_main` / `fs_main`).
pub const QUAD_SHADER: &str = r#"struct Uniforms {
    view_proj: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
    @location(1) uv: vec2<f32>,
    @location(2) @interpolate(flat) shape: u32,
};

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) quad_min: vec2<f32>,
    @location(1) quad_max: vec2<f32>,
    @location(2) color: vec4<f32>,
    @location(3) shape: u32,
) -> VertexOutput {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(0.0, 0.0),
        vec2<f32>(1.0, 0.0),
        vec2<f32>(0.0, 1.0),
        vec2<f32>(0.0, 1.0),
        vec2<f32>(1.0, 0.0),
        vec2<f32>(1.0, 1.0),
    );

    let corner = corners[vertex_index];
    let world = mix(quad_min, quad_max, corner);

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * vec4<f32>(world, 0.0, 1.0);
    out.color = color;
    out.uv = corner * 2.0 - vec2<f32>(1.0, 1.0);
    out.shape = shape;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    if in.shape == 1u && dot(in.uv, in.uv) > 1.0 {
        discard;
    }
    return in.color;
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use naga::front::wgsl;
    use naga::valid::{Capabilities, ValidationFlags, Validator};

    #[test]
    fn test_quad_shader_validates() {
        let module = match wgsl::parse_str(QUAD_SHADER) {
            Ok(module) => module,
            Err(err) => panic!("{}", err.emit_to_string(QUAD_SHADER)),
        };
        let mut validator = Validator::new(ValidationFlags::all(), Capabilities::all());
        if let Err(err) = validator.validate(&module) {
            panic!("quad shader failed validation: {:?}", err);
        }

        let entry_points: Vec<&str> = module.entry_points.iter().map(|e| e.name.as_str()).collect();
        assert!(entry_points.contains(&"vs_main"));
        assert!(entry_points.contains(&"fs_main"));
    }
}
