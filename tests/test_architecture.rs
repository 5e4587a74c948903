//! Tests for architecture parsing and building
//!
//! This file tests the architecture module including:
//! - Loading valid JSON architecture configs
//! - Parsing each layer type (Dense, Relu, Softmax)
//! - Building and wiring layers from configs
//! - Handling invalid JSON, unknown layer types and missing files
//! - Validation errors

use feedforward_layers::architecture::{
    build_layers, load_architecture, output_size, parse_architecture, ArchitectureConfig,
    LayerConfig,
};
use feedforward_layers::layers::Layer;
use feedforward_layers::ArchitectureError;
use ndarray::Array2;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_temp_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("failed to create temp file");
    file.write_all(contents.as_bytes())
        .expect("failed to write temp config");
    file
}

const CLASSIFIER_JSON: &str = r#"{
  "input_size": 3,
  "seed": 42,
  "layers": [
    { "layer_type": "dense", "neurons": 4, "weight_init_scale": 0.05 },
    { "layer_type": "relu" },
    { "layer_type": "dense", "neurons": 2 },
    { "layer_type": "softmax" }
  ]
}"#;

// ============================================================================
// Valid Architecture Loading Tests
// ============================================================================

mod valid_architecture_tests {
    use super::*;

    #[test]
    fn test_load_classifier() {
        let temp_file = write_temp_config(CLASSIFIER_JSON);
        let config = load_architecture(temp_file.path()).unwrap();

        assert_eq!(config.input_size, 3);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.layers.len(), 4);
        assert_eq!(
            config.layers[0],
            LayerConfig::Dense {
                neurons: 4,
                weight_init_scale: 0.05
            }
        );
        assert_eq!(config.layers[1], LayerConfig::Relu);
        assert_eq!(config.layers[3], LayerConfig::Softmax);
        assert_eq!(output_size(&config), 2);
    }

    #[test]
    fn test_build_and_run_classifier() {
        let config = parse_architecture(CLASSIFIER_JSON).unwrap();
        let mut layers = build_layers(&config, &mut config.rng()).unwrap();

        let dense = layers[0].as_dense().unwrap();
        assert_eq!(dense.weight_init_scale(), 0.05);
        assert_eq!(dense.input_feature_count(), Some(3));
        assert_eq!(layers[2].as_dense().unwrap().input_feature_count(), Some(4));

        let total: usize = layers.iter().map(|l| l.parameter_count()).sum();
        assert_eq!(total, (4 * 3 + 4) + (2 * 4 + 2));

        // Forward sweep in order, backward sweep in reverse
        let mut activation = Array2::from_elem((3, 5), 0.5);
        for layer in layers.iter_mut() {
            activation = layer.forward(&activation).unwrap();
        }
        assert_eq!(activation.dim(), (2, 5));

        let mut grad = Array2::from_elem((2, 5), 0.1);
        for layer in layers.iter_mut().rev() {
            grad = layer.backward(&grad).unwrap();
        }
        assert_eq!(grad.dim(), (3, 5));
        assert_eq!(layers[0].as_dense().unwrap().grad_weights().unwrap().dim(), (4, 3));
    }

    #[test]
    fn test_single_activation_layer() {
        let config =
            parse_architecture(r#"{ "input_size": 7, "layers": [ { "layer_type": "softmax" } ] }"#)
                .unwrap();
        let layers = build_layers(&config, &mut config.rng()).unwrap();
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].parameter_count(), 0);
        assert_eq!(output_size(&config), 7);
    }
}

// ============================================================================
// Invalid Architecture Tests
// ============================================================================

mod invalid_architecture_tests {
    use super::*;

    #[test]
    fn test_missing_file() {
        let err = load_architecture("definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ArchitectureError::Io(_)));
    }

    #[test]
    fn test_malformed_json() {
        let temp_file = write_temp_config("{ \"input_size\": 3, \"layers\": [");
        let err = load_architecture(temp_file.path()).unwrap_err();
        assert!(matches!(err, ArchitectureError::Json(_)));
    }

    #[test]
    fn test_unknown_layer_type() {
        let err = parse_architecture(
            r#"{ "input_size": 3, "layers": [ { "layer_type": "conv2d", "neurons": 2 } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ArchitectureError::Json(_)));
    }

    #[test]
    fn test_dense_missing_neurons() {
        let err = parse_architecture(r#"{ "input_size": 3, "layers": [ { "layer_type": "dense" } ] }"#)
            .unwrap_err();
        assert!(matches!(err, ArchitectureError::Json(_)));
    }

    #[test]
    fn test_empty_layers() {
        let err = parse_architecture(r#"{ "input_size": 3, "layers": [] }"#).unwrap_err();
        assert_eq!(err.to_string(), "Architecture must have at least one layer");
    }

    #[test]
    fn test_zero_neurons_reports_index() {
        let err = parse_architecture(
            r#"{ "input_size": 3, "layers": [
                { "layer_type": "relu" },
                { "layer_type": "dense", "neurons": 0 }
            ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ArchitectureError::Invalid { index: Some(1), .. }));
    }

    #[test]
    fn test_build_rejects_invalid_config() {
        let config = ArchitectureConfig {
            input_size: 0,
            seed: None,
            layers: vec![LayerConfig::Relu],
        };
        assert!(build_layers(&config, &mut config.rng()).is_err());
    }
}
