use std::sync::Arc;

use pinecone::PineconeClient;

use crate::{
    config::Settings,
    domain::qa::{
        model::GeminiAnswerModel, semantic::PineconeSemanticSearch, source::CsvDocumentStore,
        LazyLexicalSearch, QaError, QaService, QuestionAnswering, VectorIndexer,
    },
};

#[derive(Clone)]
pub struct AppState {
    qa_service: Arc<dyn QuestionAnswering>,
}

impl AppState {
    pub fn new(qa_service: Arc<dyn QuestionAnswering>) -> Self {
        Self { qa_service }
    }

    pub fn qa_service(&self) -> &dyn QuestionAnswering {
        self.qa_service.as_ref()
    }
}

/// Everything `main` needs to serve requests and, optionally, index on startup.
pub struct Components {
    pub app_state: AppState,
    pub indexer: VectorIndexer<CsvDocumentStore>,
}

/// Wires the concrete adapters. Fails fast on missing credentials.
pub fn build(settings: &Settings) -> Result<Components, QaError> {
    let api_key = settings.pinecone.require_api_key()?;
    let mut pinecone = PineconeClient::new(api_key);
    if let Some(url) = &settings.pinecone.control_plane_url {
        pinecone = pinecone.with_control_plane_url(url);
    }

    let store = CsvDocumentStore::new(&settings.data.faq_path, &settings.data.funds_path);
    let model = GeminiAnswerModel::new(&settings.llm.model, settings.llm.temperature)?;

    let semantic = PineconeSemanticSearch::new(
        pinecone.clone(),
        &settings.pinecone.index_name,
        &settings.pinecone.namespace,
    );
    let lexical =
        LazyLexicalSearch::with_candidates(store.clone(), settings.retrieval.lexical_candidates);
    let qa_service = QaService::new(semantic, lexical, model, settings.qa_config());

    let indexer = VectorIndexer::new(pinecone, store, settings.pinecone.indexer_config());

    Ok(Components {
        app_state: AppState::new(Arc::new(qa_service)),
        indexer,
    })
}
