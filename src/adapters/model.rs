use std::path::Path;

use anyhow::Context;
use ndarray::{Array1, Array2};
use serde::Deserialize;
use tracing::debug;

use super::CollaborativeModel;
use crate::error::{AdapterError, Result};

/// Serialized form of the trained collaborative-filtering model: one factor
/// row per user and per item, aligned with the respective vocabularies.
#[derive(Debug, Deserialize)]
struct ModelArtifact {
    dim: usize,
    user_factors: Vec<Vec<f32>>,
    item_factors: Vec<Vec<f32>>,
    #[serde(default)]
    item_bias: Option<Vec<f32>>,
}

/// Matrix-factorization scorer over the item vocabulary.
///
/// score(user, item) = user_factors[user] · item_factors[item] + bias[item]
#[derive(Debug)]
pub struct EmbeddingModel {
    user_factors: Array2<f32>,
    item_factors: Array2<f32>,
    item_bias: Array1<f32>,
}

impl EmbeddingModel {
    /// Load a JSON factor artifact produced by the training pipeline.
    /// A missing or malformed artifact is `AdapterError::Unavailable`;
    /// deployments without a model simply omit the `ModelStack`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let model = Self::try_load(path).map_err(|e| {
            AdapterError::Unavailable(format!("model artifact {}: {e:#}", path.display()))
        })?;
        debug!(
            users = model.num_users(),
            items = model.num_items(),
            "loaded collaborative model from {}",
            path.display()
        );
        Ok(model)
    }

    fn try_load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read(path).context("read artifact")?;
        let artifact: ModelArtifact = serde_json::from_slice(&raw).context("parse artifact")?;
        Self::from_artifact(artifact)
    }

    fn from_artifact(artifact: ModelArtifact) -> anyhow::Result<Self> {
        let users = to_matrix(artifact.user_factors, artifact.dim).context("user factors")?;
        let items = to_matrix(artifact.item_factors, artifact.dim).context("item factors")?;
        let bias = match artifact.item_bias {
            Some(b) => {
                anyhow::ensure!(
                    b.len() == items.nrows(),
                    "item bias has {} entries for {} items",
                    b.len(),
                    items.nrows()
                );
                Array1::from(b)
            }
            None => Array1::zeros(items.nrows()),
        };
        Ok(Self {
            user_factors: users,
            item_factors: items,
            item_bias: bias,
        })
    }

    /// Build directly from factor matrices (tests, in-process training).
    pub fn from_factors(
        user_factors: Array2<f32>,
        item_factors: Array2<f32>,
        item_bias: Option<Array1<f32>>,
    ) -> Result<Self> {
        if user_factors.ncols() != item_factors.ncols() {
            return Err(AdapterError::InvalidInput(format!(
                "factor dims differ: users {} vs items {}",
                user_factors.ncols(),
                item_factors.ncols()
            )));
        }
        let bias = match item_bias {
            Some(b) if b.len() != item_factors.nrows() => {
                return Err(AdapterError::InvalidInput(format!(
                    "item bias has {} entries for {} items",
                    b.len(),
                    item_factors.nrows()
                )))
            }
            Some(b) => b,
            None => Array1::zeros(item_factors.nrows()),
        };
        Ok(Self {
            user_factors,
            item_factors,
            item_bias: bias,
        })
    }

    pub fn num_users(&self) -> usize {
        self.user_factors.nrows()
    }
}

fn to_matrix(rows: Vec<Vec<f32>>, dim: usize) -> anyhow::Result<Array2<f32>> {
    let n = rows.len();
    let mut flat = Vec::with_capacity(n * dim);
    for (i, row) in rows.into_iter().enumerate() {
        anyhow::ensure!(
            row.len() == dim,
            "row {i} has {} factors, expected {dim}",
            row.len()
        );
        flat.extend(row);
    }
    Array2::from_shape_vec((n, dim), flat).context("factor matrix shape")
}

impl CollaborativeModel for EmbeddingModel {
    fn num_items(&self) -> usize {
        self.item_factors.nrows()
    }

    fn score_all_items(&self, user_index: usize) -> Result<Vec<f32>> {
        if user_index >= self.user_factors.nrows() {
            return Err(AdapterError::UnknownEntity(format!(
                "user index {user_index} outside vocabulary of {}",
                self.user_factors.nrows()
            )));
        }
        let user = self.user_factors.row(user_index);
        let scores = self.item_factors.dot(&user) + &self.item_bias;
        Ok(scores.to_vec())
    }
}
