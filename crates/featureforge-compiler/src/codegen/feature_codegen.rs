//! Feature, transformation, type and anchor blocks

use super::Render;
use crate::writer::{list, quote, ConfigWriter};
use featureforge_core::{
    ExpressionTransformation, Feature, FeatureAnchor, FeatureType, Transformation,
    WindowAggTransformation,
};

impl Render for FeatureType {
    fn write_config(&self, w: &mut ConfigWriter) {
        w.open("type")
            .field("type", "TENSOR")
            .field("tensorCategory", "DENSE")
            .field("dimensionType", list(self.dimension_types()))
            .field("valType", self.val_type())
            .close();
    }
}

impl Render for ExpressionTransformation {
    fn write_config(&self, w: &mut ConfigWriter) {
        w.quoted("def.sqlExpr", &self.expr);
    }
}

impl Render for WindowAggTransformation {
    fn write_config(&self, w: &mut ConfigWriter) {
        w.quoted("def.sqlExpr", &self.agg_expr);
        w.field("window", &self.window);
        w.field("aggregation", self.agg_func.as_str());
        if let Some(group_by) = &self.group_by {
            w.field("groupBy", group_by);
        }
        if let Some(filter) = &self.filter {
            w.quoted("filter", filter);
        }
        if let Some(limit) = self.limit {
            w.field("limit", limit.to_string());
        }
    }
}

impl Render for Transformation {
    fn write_config(&self, w: &mut ConfigWriter) {
        match self {
            Transformation::Expression(t) => t.write_config(w),
            Transformation::WindowAgg(t) => t.write_config(w),
        }
    }
}

/// The bare quoted expression used as a derived feature `definition`
pub(crate) fn definition(transform: &Transformation) -> String {
    match transform {
        Transformation::Expression(t) => quote(&t.expr),
        Transformation::WindowAgg(t) => quote(&t.agg_expr),
    }
}

impl Render for Feature {
    fn write_config(&self, w: &mut ConfigWriter) {
        w.open(&self.name);
        self.transform.write_config(w);
        self.feature_type.write_config(w);
        w.close();
    }
}

impl Render for FeatureAnchor {
    fn write_config(&self, w: &mut ConfigWriter) {
        w.open(&self.name);
        w.field("source", self.source.name());

        let columns = self.key_columns();
        let aliases = self.key_aliases();
        w.field("key", list(&columns));
        if aliases != columns {
            w.field("keyAlias", list(&aliases));
        }

        w.open("features");
        for feature in &self.features {
            feature.write_config(w);
        }
        w.close();
        w.close();
    }
}
