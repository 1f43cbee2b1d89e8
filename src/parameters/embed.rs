//! Embedding hook: swap text parameters for model-computed vectors.

use super::{ParamValue, ParamValues, Parameters};
use crate::types::{Error, ExecutionError, Result};
use async_trait::async_trait;
use futures::future::try_join_all;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

/// An embedding model provider.
#[async_trait]
pub trait EmbeddingModel: Debug + Send + Sync {
    /// Provider type tag, e.g. `gemini`.
    fn model_type(&self) -> &str;

    /// Embed each input text into one vector, in input order.
    async fn embed_parameters(
        &self,
        texts: &[String],
    ) -> std::result::Result<Vec<Vec<f32>>, ExecutionError>;
}

/// Embedding models by configured name.
pub type EmbeddingModels = HashMap<String, Arc<dyn EmbeddingModel>>;

/// Replace values of embedding-eligible parameters with vectors.
///
/// Parameters without `embedded_by` and null values pass through unchanged.
/// Every referenced model must be present in `models`.
pub async fn embed_params(
    parameters: &Parameters,
    mut values: ParamValues,
    models: &EmbeddingModels,
) -> Result<ParamValues> {
    let mut pending = Vec::new();
    for param in parameters.iter() {
        let Some(model_name) = param.embedding_model() else {
            continue;
        };
        let model = models
            .get(model_name)
            .ok_or_else(|| Error::EmbeddingModelNotFound {
                parameter: param.name().to_string(),
                model: model_name.to_string(),
            })?;
        match values.get(param.name()) {
            None | Some(ParamValue::Null) => continue,
            Some(ParamValue::String(text)) => {
                pending.push((param.name(), model.clone(), text.clone()));
            }
            Some(other) => {
                return Err(Error::type_mismatch(
                    param.name(),
                    "string",
                    other.type_name(),
                ))
            }
        }
    }

    if pending.is_empty() {
        return Ok(values);
    }

    let embedded = try_join_all(pending.into_iter().map(|(name, model, text)| async move {
        tracing::debug!(parameter = name, model = model.model_type(), "embedding parameter");
        let mut vectors = model
            .embed_parameters(std::slice::from_ref(&text))
            .await
            .map_err(Error::Execution)?;
        if vectors.len() != 1 {
            return Err(Error::execution(format!(
                "embedding model returned {} vectors for 1 input",
                vectors.len()
            )));
        }
        Ok::<_, Error>((name, vectors.remove(0)))
    }))
    .await?;

    for (name, vector) in embedded {
        values.insert(name, ParamValue::Vector(vector));
    }
    Ok(values)
}
