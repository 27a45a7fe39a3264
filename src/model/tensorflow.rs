// TensorFlow frozen-graph backend

use std::path::Path;

use tensorflow::{Graph, ImportGraphDefOptions, Session, SessionOptions, SessionRunArgs, Tensor};

use super::{preprocess, scores_from_probs, Classifier, ModelError, Scores};
use crate::config::ModelsConfig;
use image::RgbImage;

pub struct TfModel {
    session: Session,
    graph: Graph,
    input_size: u32,
    input_op: String,
    output_op: String,
}

impl TfModel {
    pub fn load(path: &Path, config: &ModelsConfig) -> Result<Self, ModelError> {
        let model_bytes = std::fs::read(path)?;

        let mut graph = Graph::new();
        graph
            .import_graph_def(&model_bytes, &ImportGraphDefOptions::new())
            .map_err(backend)?;
        let session = Session::new(&SessionOptions::new(), &graph).map_err(backend)?;

        // Fail at startup rather than on the first request
        graph
            .operation_by_name_required(&config.input_op)
            .map_err(backend)?;
        graph
            .operation_by_name_required(&config.output_op)
            .map_err(backend)?;

        Ok(Self {
            session,
            graph,
            input_size: config.input_size,
            input_op: config.input_op.clone(),
            output_op: config.output_op.clone(),
        })
    }
}

impl Classifier for TfModel {
    fn classify(&self, image: &RgbImage) -> Result<Scores, ModelError> {
        let size = u64::from(self.input_size);
        let flat = preprocess::to_input_tensor(image, self.input_size);
        let mut input = Tensor::<f32>::new(&[1, size, size, 3]);
        input.copy_from_slice(&flat);

        let input_op = self
            .graph
            .operation_by_name_required(&self.input_op)
            .map_err(backend)?;
        let output_op = self
            .graph
            .operation_by_name_required(&self.output_op)
            .map_err(backend)?;

        let mut args = SessionRunArgs::new();
        args.add_feed(&input_op, 0, &input);
        let token = args.request_fetch(&output_op, 0);
        self.session.run(&mut args).map_err(backend)?;

        let output: Tensor<f32> = args.fetch(token).map_err(backend)?;
        scores_from_probs(&output)
    }
}

fn backend(status: tensorflow::Status) -> ModelError {
    ModelError::Backend(status.to_string())
}
