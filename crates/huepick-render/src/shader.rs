//! Shader composition.
//!
//! Every object shader is the shared vertex stage (`shaders/object.wgsl`) plus
//! the injected embedding functions plus one fragment stage.

use huepick_core::Embedding;

use crate::error::{RenderError, RenderResult};

const OBJECT_SOURCE: &str = include_str!("shaders/object.wgsl");
const VISIBLE_SOURCE: &str = include_str!("shaders/visible.wgsl");
const ENCODING_SOURCE: &str = include_str!("shaders/encoding.wgsl");
const MARKER_SOURCE: &str = include_str!("shaders/marker.wgsl");

/// Which fragment stage an object shader uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentStage {
    /// Display color through the color embedding.
    Visible,
    /// Pick encoding: `vec4(coord, tag)`.
    Encoding,
    /// Flat black, for the cursor marker.
    Marker,
}

impl FragmentStage {
    fn source(self) -> &'static str {
        match self {
            FragmentStage::Visible => VISIBLE_SOURCE,
            FragmentStage::Encoding => ENCODING_SOURCE,
            FragmentStage::Marker => MARKER_SOURCE,
        }
    }
}

/// Builder for object shader modules.
pub struct ShaderBuilder {
    space_embedding: Option<String>,
    color_embedding: Option<String>,
    fragment: FragmentStage,
    label: Option<String>,
}

impl ShaderBuilder {
    /// Creates a builder for the given fragment stage.
    #[must_use]
    pub fn new(fragment: FragmentStage) -> Self {
        Self {
            space_embedding: None,
            color_embedding: None,
            fragment,
            label: None,
        }
    }

    /// Injects the space embedding as `space_embed(c, p)`.
    #[must_use]
    pub fn with_space_embedding(mut self, embedding: &Embedding) -> Self {
        self.space_embedding = Some(embedding.shader().to_string());
        self
    }

    /// Injects the color embedding as `color_embed(c)`.
    #[must_use]
    pub fn with_color_embedding(mut self, embedding: &Embedding) -> Self {
        self.color_embedding = Some(embedding.shader().to_string());
        self
    }

    /// Sets the shader label for debugging.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Builds the shader module.
    pub fn build_module(self, device: &wgpu::Device) -> RenderResult<wgpu::ShaderModule> {
        let source = self.combined_source()?;

        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: self.label.as_deref(),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        Ok(module)
    }

    /// Returns the full WGSL source.
    pub fn combined_source(&self) -> RenderResult<String> {
        let space = self.space_embedding.as_ref().ok_or_else(|| {
            RenderError::ShaderCompositionFailed("missing space embedding".into())
        })?;

        let mut source = format!(
            "{OBJECT_SOURCE}\n\
             fn space_embed(c: vec3<f32>, p: vec3<f32>) -> vec3<f32> {{\n{space}\n}}\n"
        );

        if self.fragment == FragmentStage::Visible {
            let color = self.color_embedding.as_ref().ok_or_else(|| {
                RenderError::ShaderCompositionFailed("missing color embedding".into())
            })?;
            source.push_str(&format!(
                "\nfn color_embed(c: vec3<f32>) -> vec3<f32> {{\n{color}\n}}\n"
            ));
        }

        source.push('\n');
        source.push_str(self.fragment.source());
        Ok(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_injects_both_embeddings() {
        let source = ShaderBuilder::new(FragmentStage::Visible)
            .with_space_embedding(&Embedding::cylinder())
            .with_color_embedding(&Embedding::hsv())
            .combined_source()
            .unwrap();
        assert!(source.contains("fn space_embed(c: vec3<f32>, p: vec3<f32>)"));
        assert!(source.contains("fn color_embed(c: vec3<f32>)"));
        assert!(source.contains(Embedding::cylinder().shader()));
        assert!(source.contains(Embedding::hsv().shader()));
        assert!(source.contains("fn vs_main"));
        assert!(source.contains("fn fs_main"));
    }

    #[test]
    fn test_encoding_ignores_color_embedding() {
        let source = ShaderBuilder::new(FragmentStage::Encoding)
            .with_space_embedding(&Embedding::cube())
            .with_color_embedding(&Embedding::rgb())
            .combined_source()
            .unwrap();
        assert!(!source.contains("fn color_embed"));
        assert!(source.contains("f32(obj.tag)"));
    }

    #[test]
    fn test_missing_space_embedding_is_error() {
        let result = ShaderBuilder::new(FragmentStage::Marker).combined_source();
        assert!(matches!(result, Err(RenderError::ShaderCompositionFailed(_))));
    }

    #[test]
    fn test_visible_requires_color_embedding() {
        let result = ShaderBuilder::new(FragmentStage::Visible)
            .with_space_embedding(&Embedding::cube())
            .combined_source();
        assert!(matches!(result, Err(RenderError::ShaderCompositionFailed(_))));
    }
}
