use std::cell::Cell;
use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::device::{ContextError, GraphicsContext, ProgramId};

use super::uniform::{UniformKind, UniformScalar, UniformShape};

/// Entry point names a shader must expose.
pub const VERTEX_ENTRY: &str = "vs_main";
pub const FRAGMENT_ENTRY: &str = "fs_main";

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Vertex => "vertex",
            Self::Fragment => "fragment",
        })
    }
}

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("failed to read shader source {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{stage} shader failed to compile:\n{message}")]
    Compile { stage: ShaderStage, message: String },

    #[error("{stage} shader has no `{entry}` {stage} entry point")]
    MissingEntryPoint { stage: ShaderStage, entry: &'static str },

    #[error("uniform `{name}` has a type uniforms cannot carry")]
    UnsupportedUniform { name: String },

    #[error("uniform buffer at @group({group}) @binding({binding}) is not supported; use @group(0) @binding(0)")]
    UnsupportedBinding { group: u32, binding: u32 },

    #[error("vertex and fragment uniform blocks differ")]
    Link,
}

/// One member of a shader's uniform block.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct UniformDecl {
    pub name: String,
    pub kind: UniformKind,
    /// Byte offset inside the uniform block.
    pub offset: u32,
}

#[derive(Debug, Clone, Default, Eq, PartialEq)]
struct UniformBlock {
    decls: Vec<UniformDecl>,
    size: u32,
}

/// A vertex + fragment WGSL program.
///
/// Sources are parsed and validated on construction; the GPU program is
/// created lazily by [`Shader::compile_and_link`] and cached, so every
/// material sharing the shader sees it compiled.
#[derive(Debug)]
pub struct Shader {
    vertex_source: String,
    fragment_source: String,
    uniforms: UniformBlock,
    program: Cell<Option<ProgramId>>,
}

impl Shader {
    pub fn new(vertex_source: impl Into<String>, fragment_source: impl Into<String>) -> Result<Self, ShaderError> {
        let vertex_source = vertex_source.into();
        let fragment_source = fragment_source.into();

        let vs = compile(ShaderStage::Vertex, &vertex_source)?;
        let fs = compile(ShaderStage::Fragment, &fragment_source)?;

        let uniforms = match (reflect_uniforms(&vs)?, reflect_uniforms(&fs)?) {
            (Some(a), Some(b)) if a != b => return Err(ShaderError::Link),
            (Some(a), _) => a,
            (None, Some(b)) => b,
            (None, None) => UniformBlock::default(),
        };

        log::debug!(
            "shader compiled: {} uniform(s), block size {}",
            uniforms.decls.len(),
            uniforms.size
        );

        Ok(Self {
            vertex_source,
            fragment_source,
            uniforms,
            program: Cell::new(None),
        })
    }

    /// Reads both sources from disk and builds the shader.
    pub fn load_from(vertex_path: impl AsRef<Path>, fragment_path: impl AsRef<Path>) -> Result<Self, ShaderError> {
        let read = |path: &Path| {
            std::fs::read_to_string(path).map_err(|source| ShaderError::Io {
                path: path.to_path_buf(),
                source,
            })
        };

        let vs = read(vertex_path.as_ref())?;
        let fs = read(fragment_path.as_ref())?;
        Self::new(vs, fs)
    }

    pub fn vertex_source(&self) -> &str {
        &self.vertex_source
    }

    pub fn fragment_source(&self) -> &str {
        &self.fragment_source
    }

    /// Uniform block members in declaration order.
    pub fn uniforms(&self) -> &[UniformDecl] {
        &self.uniforms.decls
    }

    pub fn uniform(&self, name: &str) -> Option<&UniformDecl> {
        self.uniforms.decls.iter().find(|d| d.name == name)
    }

    /// Size in bytes of the uniform block (0 when the shader has none).
    pub fn uniform_block_size(&self) -> u32 {
        self.uniforms.size
    }

    #[inline]
    pub fn is_compiled(&self) -> bool {
        self.program.get().is_some()
    }

    #[inline]
    pub fn program(&self) -> Option<ProgramId> {
        self.program.get()
    }

    /// Creates the GPU program on first call; later calls return the cached handle.
    pub fn compile_and_link<C: GraphicsContext + ?Sized>(&self, ctx: &mut C) -> Result<ProgramId, ContextError> {
        if let Some(program) = self.program.get() {
            return Ok(program);
        }
        let program = ctx.create_program(self)?;
        self.program.set(Some(program));
        Ok(program)
    }

    /// Releases the GPU program. The shader may be compiled again afterwards.
    pub fn delete<C: GraphicsContext + ?Sized>(&self, ctx: &mut C) {
        if let Some(program) = self.program.take() {
            ctx.delete_program(program);
        }
    }
}

fn compile(stage: ShaderStage, source: &str) -> Result<naga::Module, ShaderError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| ShaderError::Compile {
        stage,
        message: e.emit_to_string(source),
    })?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    validator.validate(&module).map_err(|e| ShaderError::Compile {
        stage,
        message: e.emit_to_string(source),
    })?;

    let (naga_stage, entry) = match stage {
        ShaderStage::Vertex => (naga::ShaderStage::Vertex, VERTEX_ENTRY),
        ShaderStage::Fragment => (naga::ShaderStage::Fragment, FRAGMENT_ENTRY),
    };
    if !module
        .entry_points
        .iter()
        .any(|ep| ep.stage == naga_stage && ep.name == entry)
    {
        return Err(ShaderError::MissingEntryPoint { stage, entry });
    }

    Ok(module)
}

fn reflect_uniforms(module: &naga::Module) -> Result<Option<UniformBlock>, ShaderError> {
    let mut block = None;

    for (_, var) in module.global_variables.iter() {
        if var.space != naga::AddressSpace::Uniform {
            continue;
        }
        let Some(binding) = &var.binding else { continue };
        if binding.group != 0 || binding.binding != 0 {
            return Err(ShaderError::UnsupportedBinding {
                group: binding.group,
                binding: binding.binding,
            });
        }

        let var_name = var.name.clone().unwrap_or_default();
        block = Some(match &module.types[var.ty].inner {
            naga::TypeInner::Struct { members, span } => {
                let decls = members
                    .iter()
                    .map(|m| {
                        let name = m.name.clone().unwrap_or_default();
                        let kind = uniform_kind(&module.types[m.ty].inner)
                            .ok_or_else(|| ShaderError::UnsupportedUniform { name: name.clone() })?;
                        Ok(UniformDecl { name, kind, offset: m.offset })
                    })
                    .collect::<Result<Vec<_>, ShaderError>>()?;
                UniformBlock { decls, size: *span }
            }
            inner => {
                let kind = uniform_kind(inner)
                    .ok_or_else(|| ShaderError::UnsupportedUniform { name: var_name.clone() })?;
                UniformBlock {
                    size: kind.block_size() as u32,
                    decls: vec![UniformDecl { name: var_name, kind, offset: 0 }],
                }
            }
        });
    }

    Ok(block)
}

fn uniform_kind(inner: &naga::TypeInner) -> Option<UniformKind> {
    let scalar_of = |s: &naga::Scalar| {
        if s.width != 4 {
            return None;
        }
        match s.kind {
            naga::ScalarKind::Float => Some(UniformScalar::Float),
            naga::ScalarKind::Sint => Some(UniformScalar::Sint),
            naga::ScalarKind::Uint => Some(UniformScalar::Uint),
            _ => None,
        }
    };

    match inner {
        naga::TypeInner::Scalar(s) => Some(UniformKind::new(UniformShape::Scalar, scalar_of(s)?)),
        naga::TypeInner::Vector { size, scalar } => {
            Some(UniformKind::new(UniformShape::Vector(*size as usize), scalar_of(scalar)?))
        }
        naga::TypeInner::Matrix { columns, rows, scalar } if columns == rows => Some(UniformKind::new(
            UniformShape::Matrix {
                columns: *columns as usize,
                rows: *rows as usize,
            },
            scalar_of(scalar)?,
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::HeadlessContext;

    const VS: &str = r#"
        struct Globals {
            projection: mat3x3<f32>,
            tint: vec4<f32>,
            frame: u32,
        };
        @group(0) @binding(0) var<uniform> globals: Globals;

        @vertex
        fn vs_main(@location(0) pos: vec2<f32>) -> @builtin(position) vec4<f32> {
            let p = globals.projection * vec3<f32>(pos, 1.0);
            return vec4<f32>(p.xy, 0.0, 1.0);
        }
    "#;

    const FS: &str = r#"
        @fragment
        fn fs_main() -> @location(0) vec4<f32> {
            return vec4<f32>(1.0, 1.0, 1.0, 1.0);
        }
    "#;

    // ── compile ───────────────────────────────────────────────────────────

    #[test]
    fn reflects_uniform_block() {
        let shader = Shader::new(VS, FS).unwrap();
        let names: Vec<_> = shader.uniforms().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["projection", "tint", "frame"]);

        let projection = shader.uniform("projection").unwrap();
        assert_eq!(projection.offset, 0);
        assert_eq!(
            projection.kind.shape,
            UniformShape::Matrix { columns: 3, rows: 3 }
        );
        assert_eq!(shader.uniform("tint").unwrap().offset, 48);
        assert_eq!(shader.uniform("frame").unwrap().kind.scalar, UniformScalar::Uint);
        assert_eq!(shader.uniform_block_size(), 80);
    }

    #[test]
    fn parse_errors_name_the_stage() {
        let err = Shader::new(VS, "fn broken(").unwrap_err();
        assert!(matches!(err, ShaderError::Compile { stage: ShaderStage::Fragment, .. }));
    }

    #[test]
    fn missing_entry_point() {
        let err = Shader::new(FS, FS).unwrap_err();
        assert!(matches!(
            err,
            ShaderError::MissingEntryPoint { stage: ShaderStage::Vertex, .. }
        ));
    }

    #[test]
    fn mismatched_blocks_fail_to_link() {
        let fs = r#"
            struct Globals { tint: vec4<f32> };
            @group(0) @binding(0) var<uniform> globals: Globals;

            @fragment
            fn fs_main() -> @location(0) vec4<f32> {
                return globals.tint;
            }
        "#;
        assert!(matches!(Shader::new(VS, fs), Err(ShaderError::Link)));
    }

    #[test]
    fn load_from_reports_missing_file() {
        let err = Shader::load_from("does/not/exist.wgsl", "nor/this.wgsl").unwrap_err();
        assert!(matches!(err, ShaderError::Io { .. }));
    }

    // ── program lifecycle ─────────────────────────────────────────────────

    #[test]
    fn compiles_once() {
        let shader = Shader::new(VS, FS).unwrap();
        let mut ctx = HeadlessContext::new();
        assert!(!shader.is_compiled());

        let a = shader.compile_and_link(&mut ctx).unwrap();
        let b = shader.compile_and_link(&mut ctx).unwrap();
        assert_eq!(a, b);
        assert_eq!(ctx.program_count(), 1);

        shader.delete(&mut ctx);
        assert!(!shader.is_compiled());
        assert_eq!(ctx.program_count(), 0);
    }
}
