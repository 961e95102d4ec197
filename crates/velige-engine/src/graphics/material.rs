use std::cell::RefCell;
use std::rc::Rc;

use crate::device::{GraphicsContext, UniformLocation};
use crate::error::{Error, Result};

use super::shader::Shader;
use super::uniform::{UniformKind, UniformValue};

/// Material shared between meshes.
pub type MaterialRef = Rc<RefCell<Material>>;

#[derive(Debug)]
struct UniformSlot {
    name: String,
    kind: UniformKind,
    value: Option<UniformValue>,
    location: Option<UniformLocation>,
    dirty: bool,
}

/// A shader plus the values of its uniforms.
///
/// Slots come from the shader's uniform block. Values are uploaded on
/// [`Material::bind`] only when they changed since the last upload.
#[derive(Debug)]
pub struct Material {
    shader: Rc<Shader>,
    slots: Vec<UniformSlot>,
}

impl Material {
    pub fn new(shader: Rc<Shader>) -> Self {
        let slots = shader
            .uniforms()
            .iter()
            .map(|decl| UniformSlot {
                name: decl.name.clone(),
                kind: decl.kind,
                value: None,
                location: None,
                dirty: false,
            })
            .collect();
        Self { shader, slots }
    }

    pub fn into_shared(self) -> MaterialRef {
        Rc::new(RefCell::new(self))
    }

    #[inline]
    pub fn shader(&self) -> &Rc<Shader> {
        &self.shader
    }

    /// Sets a uniform by name. The value must match the declared shape and
    /// scalar family.
    pub fn set_uniform(&mut self, name: &str, value: impl Into<UniformValue>) -> Result<()> {
        let value = value.into();
        let slot = self
            .slots
            .iter_mut()
            .find(|s| s.name == name)
            .ok_or_else(|| Error::UnknownUniform(name.to_owned()))?;

        let found = value.kind();
        if found != slot.kind {
            return Err(Error::UniformMismatch {
                name: name.to_owned(),
                expected: slot.kind,
                found,
            });
        }

        slot.value = Some(value);
        slot.dirty = true;
        Ok(())
    }

    pub fn uniform(&self, name: &str) -> Option<&UniformValue> {
        self.slots
            .iter()
            .find(|s| s.name == name)
            .and_then(|s| s.value.as_ref())
    }

    /// Names of the uniforms this material can still set.
    pub fn uniform_names(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|s| s.name.as_str())
    }

    /// Makes the shader current and uploads changed uniforms.
    ///
    /// A uniform whose location the context cannot resolve is dropped
    /// with a warning.
    pub fn bind<C: GraphicsContext + ?Sized>(&mut self, ctx: &mut C) {
        let Some(program) = self.shader.program() else {
            log::warn!("cannot bind material: its shader is not compiled");
            return;
        };
        ctx.use_program(program);

        self.slots.retain_mut(|slot| {
            if !slot.dirty {
                return true;
            }
            let Some(value) = &slot.value else { return true };

            let location = match slot.location {
                Some(location) if location.program == program => location,
                _ => match ctx.uniform_location(program, &slot.name) {
                    Some(location) => {
                        slot.location = Some(location);
                        location
                    }
                    None => {
                        log::warn!("uniform `{}` has no location; dropping it", slot.name);
                        return false;
                    }
                },
            };

            ctx.set_uniform(&location, value);
            slot.dirty = false;
            true
        });
    }
}
