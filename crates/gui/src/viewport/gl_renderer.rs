use glow::HasContext;

use super::camera::ArcBallCamera;
use super::mesh::{self, LineMeshData, MeshData};
use crate::state::settings::{AxisSettings, GridSettings};

/// Direction towards the key light, world space
const LIGHT_DIR: glam::Vec3 = glam::Vec3::new(10.0, 10.0, 5.0);
const AMBIENT: f32 = 0.5;

// ── Render parameters ────────────────────────────────────────

/// Parameters for rendering the viewport
pub struct RenderParams {
    /// Viewport rectangle [x, y, width, height] in pixels
    pub viewport: [f32; 4],
    pub grid_visible: bool,
    pub axes_visible: bool,
    /// Background color RGB
    pub bg_color: [u8; 3],
}

// ── GPU mesh handles ─────────────────────────────────────────

struct GpuMesh {
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    ibo: glow::Buffer,
    index_count: i32,
}

struct GpuLines {
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    vertex_count: i32,
}

// ── Main GL renderer ─────────────────────────────────────────

pub struct GlRenderer {
    mesh_program: glow::Program,
    line_program: glow::Program,
    grid: Option<GpuLines>,
    axes: Option<GpuLines>,
    /// Cached grid settings to detect changes
    cached_grid_settings: Option<(i32, f32, f32)>,
    /// Cached axes length to detect changes
    cached_axes_length: Option<f32>,
    /// Shape meshes in draw order
    scene_meshes: Vec<GpuMesh>,
    /// Ground footprints under the shapes
    shadows: Option<GpuLines>,
    /// Manipulator lines (shown when a shape is selected)
    gizmo: Option<GpuLines>,
    /// Mesh cache rebuild counter of the uploaded meshes
    last_mesh_version: Option<u64>,
}

impl GlRenderer {
    pub fn new(gl: &glow::Context) -> Result<Self, String> {
        let mesh_program = compile_program(gl, MESH_VERT, MESH_FRAG)?;
        let line_program = compile_program(gl, LINE_VERT, LINE_FRAG)?;
        Ok(Self {
            mesh_program,
            line_program,
            grid: None,
            axes: None,
            cached_grid_settings: None,
            cached_axes_length: None,
            scene_meshes: Vec::new(),
            shadows: None,
            gizmo: None,
            last_mesh_version: None,
        })
    }

    /// Update grid mesh based on settings
    pub fn update_grid(&mut self, gl: &glow::Context, settings: &GridSettings) {
        let new_settings = (settings.range, settings.size, settings.opacity);
        if self.cached_grid_settings == Some(new_settings) {
            return;
        }
        if let Some(old) = self.grid.take() {
            delete_lines(gl, &old);
        }
        let grid_data = mesh::grid(settings.range, settings.size, settings.opacity);
        self.grid = upload_lines(gl, &grid_data).map_err(log_upload_error).ok();
        self.cached_grid_settings = Some(new_settings);
    }

    /// Update axes mesh based on settings
    pub fn update_axes(&mut self, gl: &glow::Context, settings: &AxisSettings) {
        if self.cached_axes_length == Some(settings.length) {
            return;
        }
        if let Some(old) = self.axes.take() {
            delete_lines(gl, &old);
        }
        let axes_data = mesh::axes(settings.length);
        self.axes = upload_lines(gl, &axes_data).map_err(log_upload_error).ok();
        self.cached_axes_length = Some(settings.length);
    }

    /// Replace the uploaded shape meshes when the cache was rebuilt
    pub fn sync_meshes(&mut self, gl: &glow::Context, meshes: &[MeshData], version: u64) {
        if self.last_mesh_version == Some(version) {
            return;
        }
        self.last_mesh_version = Some(version);

        for mesh in self.scene_meshes.drain(..) {
            delete_mesh(gl, &mesh);
        }
        for data in meshes {
            match upload_mesh(gl, data) {
                Ok(mesh) => self.scene_meshes.push(mesh),
                Err(e) => log_upload_error(e),
            }
        }

        if let Some(old) = self.shadows.take() {
            delete_lines(gl, &old);
        }
        let shadow_data = mesh::contact_shadows(meshes);
        if shadow_data.vertex_count() > 0 {
            self.shadows = upload_lines(gl, &shadow_data).map_err(log_upload_error).ok();
        }
    }

    /// Upload or remove the manipulator lines
    pub fn sync_gizmo(&mut self, gl: &glow::Context, data: Option<&LineMeshData>) {
        if let Some(old) = self.gizmo.take() {
            delete_lines(gl, &old);
        }
        if let Some(line_data) = data {
            self.gizmo = upload_lines(gl, line_data).map_err(log_upload_error).ok();
        }
    }

    /// Render the scene
    pub fn paint(&self, gl: &glow::Context, camera: &ArcBallCamera, params: &RenderParams) {
        let aspect = params.viewport[2] / params.viewport[3].max(1.0);
        let vp = camera.view_projection(aspect);

        unsafe {
            gl.viewport(
                params.viewport[0] as i32,
                params.viewport[1] as i32,
                params.viewport[2] as i32,
                params.viewport[3] as i32,
            );
            gl.scissor(
                params.viewport[0] as i32,
                params.viewport[1] as i32,
                params.viewport[2] as i32,
                params.viewport[3] as i32,
            );
            gl.enable(glow::SCISSOR_TEST);

            gl.clear_color(
                params.bg_color[0] as f32 / 255.0,
                params.bg_color[1] as f32 / 255.0,
                params.bg_color[2] as f32 / 255.0,
                1.0,
            );
            gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);

            gl.enable(glow::DEPTH_TEST);
            gl.depth_func(glow::LESS);

            // Grid and axes
            gl.use_program(Some(self.line_program));
            set_uniform_mat4(gl, self.line_program, "u_mvp", &vp);
            gl.enable(glow::BLEND);
            gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);

            if params.grid_visible {
                if let Some(ref grid) = self.grid {
                    draw_lines(gl, grid);
                }
            }
            if params.axes_visible {
                if let Some(ref axes) = self.axes {
                    draw_lines(gl, axes);
                }
            }

            // Contact shadows: blended over the grid, never occluding shapes
            if let Some(ref shadows) = self.shadows {
                gl.depth_mask(false);
                draw_triangles(gl, shadows);
                gl.depth_mask(true);
            }

            // Shapes
            gl.use_program(Some(self.mesh_program));
            set_uniform_mat4(gl, self.mesh_program, "u_mvp", &vp);
            set_uniform_vec3(gl, self.mesh_program, "u_light_dir", &LIGHT_DIR.normalize());
            set_uniform_f32(gl, self.mesh_program, "u_ambient", AMBIENT);

            for mesh in &self.scene_meshes {
                draw_mesh(gl, mesh);
            }

            // Gizmo on top of everything
            if let Some(ref gizmo) = self.gizmo {
                gl.disable(glow::DEPTH_TEST);
                gl.use_program(Some(self.line_program));
                set_uniform_mat4(gl, self.line_program, "u_mvp", &vp);
                gl.line_width(3.0);
                draw_lines(gl, gizmo);
                gl.line_width(1.0);
            }

            gl.disable(glow::BLEND);
            gl.disable(glow::DEPTH_TEST);
            gl.disable(glow::SCISSOR_TEST);
            gl.use_program(None);
        }
    }

    pub fn destroy(&mut self, gl: &glow::Context) {
        unsafe {
            gl.delete_program(self.mesh_program);
            gl.delete_program(self.line_program);
        }
        for lines in [self.grid.take(), self.axes.take(), self.shadows.take(), self.gizmo.take()]
            .into_iter()
            .flatten()
        {
            delete_lines(gl, &lines);
        }
        for mesh in self.scene_meshes.drain(..) {
            delete_mesh(gl, &mesh);
        }
    }
}

fn log_upload_error(e: String) {
    tracing::error!("GPU upload failed: {e}");
}

// ── GPU upload ───────────────────────────────────────────────

fn upload_mesh(gl: &glow::Context, data: &MeshData) -> Result<GpuMesh, String> {
    unsafe {
        let vao = gl.create_vertex_array()?;
        gl.bind_vertex_array(Some(vao));

        let vbo = gl.create_buffer()?;
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
        gl.buffer_data_u8_slice(
            glow::ARRAY_BUFFER,
            bytemuck_cast_slice(&data.vertices),
            glow::STATIC_DRAW,
        );

        let stride = 9 * 4; // 9 floats * 4 bytes
        // position: location 0
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);
        // normal: location 1
        gl.enable_vertex_attrib_array(1);
        gl.vertex_attrib_pointer_f32(1, 3, glow::FLOAT, false, stride, 3 * 4);
        // color: location 2
        gl.enable_vertex_attrib_array(2);
        gl.vertex_attrib_pointer_f32(2, 3, glow::FLOAT, false, stride, 6 * 4);

        let ibo = gl.create_buffer()?;
        gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ibo));
        gl.buffer_data_u8_slice(
            glow::ELEMENT_ARRAY_BUFFER,
            bytemuck_cast_slice(&data.indices),
            glow::STATIC_DRAW,
        );

        gl.bind_vertex_array(None);

        Ok(GpuMesh {
            vao,
            vbo,
            ibo,
            index_count: data.indices.len() as i32,
        })
    }
}

fn upload_lines(gl: &glow::Context, data: &LineMeshData) -> Result<GpuLines, String> {
    unsafe {
        let vao = gl.create_vertex_array()?;
        gl.bind_vertex_array(Some(vao));

        let vbo = gl.create_buffer()?;
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
        gl.buffer_data_u8_slice(
            glow::ARRAY_BUFFER,
            bytemuck_cast_slice(&data.vertices),
            glow::STATIC_DRAW,
        );

        let stride = 7 * 4; // 7 floats * 4 bytes
        // position: location 0
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);
        // color: location 1
        gl.enable_vertex_attrib_array(1);
        gl.vertex_attrib_pointer_f32(1, 4, glow::FLOAT, false, stride, 3 * 4);

        gl.bind_vertex_array(None);

        Ok(GpuLines {
            vao,
            vbo,
            vertex_count: data.vertex_count() as i32,
        })
    }
}

fn delete_mesh(gl: &glow::Context, mesh: &GpuMesh) {
    unsafe {
        gl.delete_vertex_array(mesh.vao);
        gl.delete_buffer(mesh.vbo);
        gl.delete_buffer(mesh.ibo);
    }
}

fn delete_lines(gl: &glow::Context, lines: &GpuLines) {
    unsafe {
        gl.delete_vertex_array(lines.vao);
        gl.delete_buffer(lines.vbo);
    }
}

// ── Draw calls ───────────────────────────────────────────────

unsafe fn draw_mesh(gl: &glow::Context, mesh: &GpuMesh) {
    gl.bind_vertex_array(Some(mesh.vao));
    gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(mesh.ibo));
    gl.draw_elements(glow::TRIANGLES, mesh.index_count, glow::UNSIGNED_INT, 0);
    gl.bind_vertex_array(None);
}

unsafe fn draw_lines(gl: &glow::Context, lines: &GpuLines) {
    gl.bind_vertex_array(Some(lines.vao));
    gl.draw_arrays(glow::LINES, 0, lines.vertex_count);
    gl.bind_vertex_array(None);
}

/// Same vertex layout as lines, drawn as a triangle list
unsafe fn draw_triangles(gl: &glow::Context, tris: &GpuLines) {
    gl.bind_vertex_array(Some(tris.vao));
    gl.draw_arrays(glow::TRIANGLES, 0, tris.vertex_count);
    gl.bind_vertex_array(None);
}

// ── Shader compilation ───────────────────────────────────────

fn compile_program(gl: &glow::Context, vert_src: &str, frag_src: &str) -> Result<glow::Program, String> {
    unsafe {
        let program = gl.create_program()?;
        let vert = compile_shader(gl, glow::VERTEX_SHADER, vert_src)?;
        let frag = compile_shader(gl, glow::FRAGMENT_SHADER, frag_src)?;

        gl.attach_shader(program, vert);
        gl.attach_shader(program, frag);
        gl.link_program(program);
        gl.delete_shader(vert);
        gl.delete_shader(frag);

        if !gl.get_program_link_status(program) {
            let log = gl.get_program_info_log(program);
            gl.delete_program(program);
            return Err(format!("program link error: {log}"));
        }
        Ok(program)
    }
}

unsafe fn compile_shader(gl: &glow::Context, kind: u32, src: &str) -> Result<glow::Shader, String> {
    let shader = gl.create_shader(kind)?;
    gl.shader_source(shader, src);
    gl.compile_shader(shader);
    if !gl.get_shader_compile_status(shader) {
        let log = gl.get_shader_info_log(shader);
        gl.delete_shader(shader);
        return Err(format!("shader compile error: {log}"));
    }
    Ok(shader)
}

// ── Uniform setters ──────────────────────────────────────────

fn set_uniform_mat4(gl: &glow::Context, program: glow::Program, name: &str, mat: &glam::Mat4) {
    unsafe {
        let loc = gl.get_uniform_location(program, name);
        gl.uniform_matrix_4_f32_slice(loc.as_ref(), false, &mat.to_cols_array());
    }
}

fn set_uniform_vec3(gl: &glow::Context, program: glow::Program, name: &str, v: &glam::Vec3) {
    unsafe {
        let loc = gl.get_uniform_location(program, name);
        gl.uniform_3_f32(loc.as_ref(), v.x, v.y, v.z);
    }
}

fn set_uniform_f32(gl: &glow::Context, program: glow::Program, name: &str, v: f32) {
    unsafe {
        let loc = gl.get_uniform_location(program, name);
        gl.uniform_1_f32(loc.as_ref(), v);
    }
}

// ── Byte cast helper ─────────────────────────────────────────

fn bytemuck_cast_slice<T: Copy>(slice: &[T]) -> &[u8] {
    unsafe {
        std::slice::from_raw_parts(
            slice.as_ptr() as *const u8,
            std::mem::size_of_val(slice),
        )
    }
}

// ── Shaders ──────────────────────────────────────────────────

const MESH_VERT: &str = r#"#version 330 core
uniform mat4 u_mvp;

layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;
layout(location = 2) in vec3 a_color;

out vec3 v_normal;
out vec3 v_color;

void main() {
    gl_Position = u_mvp * vec4(a_position, 1.0);
    v_normal = a_normal;
    v_color = a_color;
}
"#;

const MESH_FRAG: &str = r#"#version 330 core
uniform vec3 u_light_dir;
uniform float u_ambient;

in vec3 v_normal;
in vec3 v_color;

out vec4 frag_color;

void main() {
    vec3 n = normalize(v_normal);
    float diffuse = max(dot(n, u_light_dir), 0.0);
    float light = min(u_ambient + diffuse * (1.0 - u_ambient * 0.5), 1.0);
    frag_color = vec4(v_color * light, 1.0);
}
"#;

const LINE_VERT: &str = r#"#version 330 core
uniform mat4 u_mvp;

layout(location = 0) in vec3 a_position;
layout(location = 1) in vec4 a_color;

out vec4 v_color;

void main() {
    gl_Position = u_mvp * vec4(a_position, 1.0);
    v_color = a_color;
}
"#;

const LINE_FRAG: &str = r#"#version 330 core
in vec4 v_color;
out vec4 frag_color;

void main() {
    frag_color = v_color;
}
"#;
