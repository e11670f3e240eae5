//! Fitted-model inference: trees, scaling, classifiers, and the ensemble.
//!
//! Nothing in this module trains anything. All parameters come from a
//! [`artifact::ModelArtifact`] produced by an offline training process and
//! loaded once at startup; inference is pure and lock-free over shared
//! read-only state.

pub mod artifact;
pub mod classifier;
pub mod ensemble;
pub mod scaler;
pub mod tree;

pub use artifact::ModelArtifact;
pub use classifier::{BoostedClassifier, Classifier, ForestClassifier};
pub use ensemble::{EnsembleOutput, EnsemblePredictor};
pub use scaler::Scaler;
pub use tree::{DecisionTree, TreeNode};
