/// WGSL ray tracer: every pixel follows a geodesic of the composite space
/// (unit 3-sphere for `w <= 0`, 2-sphere × line for `w > 0`) from the camera.
pub const RAYMARCH_SHADER: &str = r#"
struct Camera {
    // Columns: right, up, forward, position.
    camera: mat4x4<f32>,
    frustum: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> cam: Camera;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) ndc: vec2<f32>,
};

@vertex
fn vs_main(@location(0) position: vec2<f32>) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = vec4<f32>(position, 0.0, 1.0);
    out.ndc = position;
    return out;
}

const STEP: f32 = 0.02;
const MAX_STEPS: i32 = 600;
const BALL_RADIUS: f32 = 0.12;
const FOG_COLOR: vec3<f32> = vec3<f32>(0.02, 0.02, 0.04);

struct Ray {
    p: vec4<f32>,
    v: vec4<f32>,
};

fn step_sphere(r: Ray, t: f32) -> Ray {
    let c = cos(t);
    let s = sin(t);
    return Ray(r.p * c + r.v * s, r.v * c - r.p * s);
}

fn step_cylinder(r: Ray, t: f32) -> Ray {
    var p = r.p;
    var v = r.v;
    let lateral = length(r.v.xyz);
    if (lateral > 1e-6) {
        let dir = r.v.xyz / lateral;
        let c = cos(lateral * t);
        let s = sin(lateral * t);
        p = vec4<f32>(r.p.xyz * c + dir * s, r.p.w);
        v = vec4<f32>((dir * c - r.p.xyz * s) * lateral, r.v.w);
    }
    p.w = r.p.w + r.v.w * t;
    return Ray(p, v);
}

// Re-seat a ray on the sheet it just entered.
fn onto_cylinder(r: Ray) -> Ray {
    let xyz = normalize(r.p.xyz);
    let vxyz = r.v.xyz - xyz * dot(r.v.xyz, xyz);
    return Ray(vec4<f32>(xyz, r.p.w), normalize(vec4<f32>(vxyz, r.v.w)));
}

fn onto_sphere(r: Ray) -> Ray {
    let p = normalize(r.p);
    return Ray(p, normalize(r.v - p * dot(r.v, p)));
}

fn advance(r: Ray) -> Ray {
    if (r.p.w <= 0.0) {
        var n = step_sphere(r, STEP);
        if (n.p.w > 0.0) {
            n = onto_cylinder(n);
        }
        return n;
    }
    var n = step_cylinder(r, STEP);
    if (n.p.w <= 0.0) {
        n = onto_sphere(n);
    }
    return n;
}

// Brightness from how squarely the ray heads for the ball centre.
fn lambert(r: Ray, toward: vec4<f32>) -> f32 {
    let len = length(toward);
    if (len < 1e-6) {
        return 1.0;
    }
    return 0.25 + 0.75 * max(dot(r.v, toward / len), 0.0);
}

// Colour of the ball containing the ray's point; alpha 0 means empty space.
fn hit(r: Ray) -> vec4<f32> {
    if (r.p.w <= 0.0) {
        var centres = array<vec4<f32>, 4>(
            vec4<f32>(0.0, 0.0, -0.5646, -0.8253),
            vec4<f32>(0.5646, 0.0, 0.0, -0.8253),
            vec4<f32>(0.0, 0.5646, 0.0, -0.8253),
            vec4<f32>(0.0, 0.0, 0.8415, -0.5403),
        );
        var colours = array<vec3<f32>, 4>(
            vec3<f32>(0.9, 0.2, 0.2),
            vec3<f32>(0.2, 0.9, 0.3),
            vec3<f32>(0.2, 0.4, 0.95),
            vec3<f32>(0.95, 0.85, 0.2),
        );
        let inside = cos(BALL_RADIUS);
        for (var i = 0; i < 4; i++) {
            let c = centres[i];
            let d = dot(r.p, c);
            if (d > inside) {
                return vec4<f32>(colours[i] * lambert(r, c - r.p * d), 1.0);
            }
        }
        return vec4<f32>(0.0);
    }

    var centres = array<vec4<f32>, 4>(
        vec4<f32>(0.0, 0.0, -1.0, 1.0),
        vec4<f32>(1.0, 0.0, 0.0, 2.0),
        vec4<f32>(0.0, -1.0, 0.0, 0.5),
        vec4<f32>(0.0, 0.0, 1.0, 3.0),
    );
    var colours = array<vec3<f32>, 4>(
        vec3<f32>(0.95, 0.55, 0.1),
        vec3<f32>(0.1, 0.85, 0.9),
        vec3<f32>(0.9, 0.9, 0.9),
        vec3<f32>(0.85, 0.2, 0.85),
    );
    for (var i = 0; i < 4; i++) {
        let c = centres[i];
        let d = dot(r.p.xyz, c.xyz);
        let arc = acos(clamp(d, -1.0, 1.0));
        let axial = c.w - r.p.w;
        if (arc * arc + axial * axial < BALL_RADIUS * BALL_RADIUS) {
            let toward = vec4<f32>(c.xyz - r.p.xyz * d, axial);
            return vec4<f32>(colours[i] * lambert(r, toward), 1.0);
        }
    }
    return vec4<f32>(0.0);
}

fn sky(r: Ray) -> vec3<f32> {
    if (r.p.w <= 0.0) {
        return vec3<f32>(0.05, 0.07, 0.15);
    }
    let t = clamp(r.v.w * 0.5 + 0.5, 0.0, 1.0);
    return mix(vec3<f32>(0.04, 0.03, 0.08), vec3<f32>(0.3, 0.2, 0.4), t);
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let right = cam.camera[0];
    let up = cam.camera[1];
    let forward = cam.camera[2];
    let dir = right * (in.ndc.x * cam.frustum.x) + up * (in.ndc.y * cam.frustum.y) - forward;

    var ray = Ray(cam.camera[3], normalize(dir));
    for (var i = 0; i < MAX_STEPS; i++) {
        let h = hit(ray);
        if (h.a > 0.0) {
            let fade = exp(-f32(i) * STEP * 0.25);
            return vec4<f32>(mix(FOG_COLOR, h.rgb, fade), 1.0);
        }
        ray = advance(ray);
    }
    return vec4<f32>(sky(ray), 1.0);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shader_exposes_pipeline_entry_points() {
        assert!(RAYMARCH_SHADER.contains("fn vs_main("));
        assert!(RAYMARCH_SHADER.contains("fn fs_main("));
        assert!(RAYMARCH_SHADER.contains("@group(0) @binding(0)"));
    }
}
