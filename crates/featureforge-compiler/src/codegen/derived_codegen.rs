//! Derived feature blocks

use super::feature_codegen::definition;
use super::Render;
use crate::writer::{list, ConfigWriter};
use featureforge_core::{DerivedFeature, FeatureBase};

impl Render for DerivedFeature {
    fn write_config(&self, w: &mut ConfigWriter) {
        w.open(&self.name);
        w.field("key", list(&self.key_alias()));

        // Inputs keep construction order; expressions may rely on it
        w.open("inputs");
        for input in &self.input_features {
            w.open(input.feature_alias());
            w.line(format!("key: {},", list(&input.key_alias())));
            w.field("feature", input.name());
            w.close();
        }
        w.close();

        w.field("definition", definition(&self.transform));
        self.feature_type.write_config(w);
        w.close();
    }
}
