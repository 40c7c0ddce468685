//! Extractor fixtures for engine tests

use crate::descriptor::FeatureDescriptor;
use crate::error::FeatureError;
use crate::extractor::{Dependency, DependencyValues, FeatureExtractor};
use symbolic_repr::{IntermediateRepresentation, NoteSequence, Segment};

#[derive(Debug, Clone, Copy)]
enum Base {
    Constant(f64),
    /// First rhythmic value of the representation, used as a window tag
    WindowTag,
}

#[derive(Debug, Clone, Copy)]
enum Fault {
    None,
    ErrorAt(f64),
    PanicAt(f64),
    WrongLength,
}

/// Returns `base + sum(dependency[0])`, repeated `dimensions` times
#[derive(Debug, Clone)]
pub struct TestFeature {
    descriptor: FeatureDescriptor,
    dependencies: Vec<Dependency>,
    base: Base,
    fault: Fault,
}

impl TestFeature {
    pub fn constant(name: &str, value: f64) -> Self {
        Self::build(name, Base::Constant(value))
    }

    pub fn window_tag(name: &str) -> Self {
        Self::build(name, Base::WindowTag)
    }

    fn build(name: &str, base: Base) -> Self {
        Self {
            descriptor: FeatureDescriptor::new(name, "test feature", true, 1),
            dependencies: Vec::new(),
            base,
            fault: Fault::None,
        }
    }

    pub fn depends_on(mut self, name: &str, offset: i32) -> Self {
        self.dependencies.push(Dependency::new(name, offset));
        self
    }

    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.descriptor = FeatureDescriptor::new(
            self.descriptor.name(),
            "test feature",
            self.descriptor.is_sequential(),
            dimensions,
        );
        self
    }

    pub fn overall(mut self) -> Self {
        self.descriptor = FeatureDescriptor::new(
            self.descriptor.name(),
            "test feature",
            false,
            self.descriptor.dimensions(),
        );
        self
    }

    /// Fail when the window tag equals `tag`
    pub fn failing_at(mut self, tag: f64) -> Self {
        self.fault = Fault::ErrorAt(tag);
        self
    }

    /// Panic when the window tag equals `tag`
    pub fn panicking_at(mut self, tag: f64) -> Self {
        self.fault = Fault::PanicAt(tag);
        self
    }

    /// Always return one value too many
    pub fn wrong_length(mut self) -> Self {
        self.fault = Fault::WrongLength;
        self
    }
}

fn tag(representation: &IntermediateRepresentation) -> f64 {
    representation.rhythmic_values.first().copied().unwrap_or(-100.0)
}

impl FeatureExtractor for TestFeature {
    fn descriptor(&self) -> &FeatureDescriptor {
        &self.descriptor
    }

    fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    fn compute(
        &self,
        _sequence: &NoteSequence,
        representation: &IntermediateRepresentation,
        dependencies: &DependencyValues<'_>,
    ) -> Result<Vec<f64>, FeatureError> {
        let window = tag(representation);
        match self.fault {
            Fault::ErrorAt(t) if t == window => {
                return Err(FeatureError::Runtime(format!("refusing window {}", t)))
            }
            Fault::PanicAt(t) if t == window => panic!("test feature panicked at {}", t),
            _ => {}
        }

        let mut value = match self.base {
            Base::Constant(v) => v,
            Base::WindowTag => window,
        };
        for i in 0..dependencies.len() {
            value += dependencies.require(i)?[0];
        }

        let mut dimensions = self.descriptor.dimensions();
        if let Fault::WrongLength = self.fault {
            dimensions += 1;
        }
        Ok(vec![value; dimensions])
    }
}

/// Segment whose representation is tagged with `tag`
pub fn tagged_segment(tag: f64) -> Segment {
    Segment::new(
        NoteSequence::default(),
        IntermediateRepresentation {
            rhythmic_values: vec![tag],
            ..Default::default()
        },
    )
}

/// Windows tagged 0, 1, 2, ...
pub fn tagged_windows(count: usize) -> Vec<Segment> {
    (0..count).map(|w| tagged_segment(w as f64)).collect()
}
