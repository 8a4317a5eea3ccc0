use super::*;
use crate::core::batch::{Tensor2D, Tensor4D};
use crate::core::errors::SimpleError;
use crate::core::traits::InferenceEngine;
use ndarray::ArrayView2;
use ort::value::TensorRef;

impl OrtInfer {
    /// Returns the configured or discovered output tensor name.
    fn get_output_name(&self) -> Result<String, ClassifyError> {
        self.output_name.clone().ok_or_else(|| {
            ClassifyError::invalid_input(
                "No outputs available in session - model may be invalid or corrupted",
            )
        })
    }

    fn run_inference_with_processor<T>(
        &self,
        x: &Tensor4D,
        processor: impl FnOnce(&[i64], &[f32]) -> Result<T, ClassifyError>,
    ) -> Result<T, ClassifyError> {
        let input_shape = x.shape().to_vec();
        let output_name = self.get_output_name()?;

        let input_tensor = TensorRef::from_array_view(x.view()).map_err(|e| {
            ClassifyError::inference_error(
                &self.model_name,
                format!("failed to convert input tensor with shape {:?}", input_shape),
                e,
            )
        })?;

        let inputs = ort::inputs![self.input_name.as_str() => input_tensor];

        let mut session_guard = self.session.lock().map_err(|_| {
            ClassifyError::inference_error(
                &self.model_name,
                "failed to acquire session lock",
                SimpleError::new("session mutex poisoned"),
            )
        })?;

        let outputs = session_guard.run(inputs).map_err(|e| {
            ClassifyError::inference_error(
                &self.model_name,
                format!(
                    "forward pass failed with input '{}' {:?} -> output '{}'",
                    self.input_name, input_shape, output_name
                ),
                e,
            )
        })?;

        let (output_shape, output_data) = outputs[output_name.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(|e| {
                ClassifyError::inference_error(
                    &self.model_name,
                    format!("failed to extract output tensor '{}' as f32", output_name),
                    e,
                )
            })?;

        processor(output_shape, output_data)
    }

    /// Runs the model and returns a `batch x classes` score matrix.
    ///
    /// Outputs shaped `[batch, classes, 1, ...]` are accepted as long as every
    /// trailing dimension is 1.
    pub fn infer_2d(&self, x: &Tensor4D) -> Result<Tensor2D, ClassifyError> {
        let batch_size = x.shape()[0];
        self.run_inference_with_processor(x, |output_shape, output_data| {
            if output_shape.len() < 2 || output_shape[2..].iter().any(|&d| d != 1) {
                return Err(ClassifyError::inference_error(
                    &self.model_name,
                    format!("expected a 2D score output, got shape {:?}", output_shape),
                    SimpleError::new("Invalid output tensor dimensions"),
                ));
            }

            let num_classes = output_shape[1] as usize;
            let expected_len = batch_size * num_classes;
            if output_data.len() != expected_len {
                return Err(ClassifyError::inference_error(
                    &self.model_name,
                    format!(
                        "output data size mismatch: expected {}, got {}",
                        expected_len,
                        output_data.len()
                    ),
                    SimpleError::new("Output tensor data size mismatch"),
                ));
            }

            let array_view = ArrayView2::from_shape((batch_size, num_classes), output_data)
                .map_err(|e| {
                    ClassifyError::tensor_operation("failed to reshape model output", e)
                })?;
            Ok(array_view.to_owned())
        })
    }
}

impl InferenceEngine for OrtInfer {
    fn infer_2d(&self, input: &Tensor4D) -> Result<Tensor2D, ClassifyError> {
        OrtInfer::infer_2d(self, input)
    }

    fn engine_name(&self) -> &str {
        &self.model_name
    }
}
