//! User-visible strings (pt-BR, matching the backend's language).

/// Heading of the welcome placeholder.
pub const WELCOME_TITLE: &str = "Olá! Bem-vindo ao Manus Bot";

/// Body of the welcome placeholder.
pub const WELCOME_BODY: &str = "Sou seu especialista em análise de dados. Posso ajudá-lo a extrair insights, identificar padrões e responder questões específicas sobre suas informações.";

/// Bot prompt for blank chat input.
pub const EMPTY_MESSAGE: &str = "Por favor, digite uma mensagem.";

/// Bot prompt for an upload with no file selected.
pub const NO_FILE_SELECTED: &str = "Por favor, selecione um arquivo CSV para upload.";

/// Fallback bot message when a chat request fails.
pub const CHAT_FAILED: &str =
    "Desculpe, houve um erro ao processar sua solicitação. Por favor, tente novamente.";

/// Fallback bot message when an upload fails.
pub const UPLOAD_FAILED: &str = "Desculpe, houve um erro ao fazer upload do arquivo CSV. Por favor, verifique se o arquivo está no formato correto.";

/// Notice shown when deleting the last conversation.
pub const LAST_CONVERSATION: &str = "Não é possível excluir a única conversa restante.";

/// Label for user messages.
pub const USER_LABEL: &str = "Você";

/// Label for bot messages.
pub const BOT_LABEL: &str = "Bot";

/// Heading of the history list.
pub const HISTORY_HEADING: &str = "Conversas";

/// User-side line announcing an upload.
#[must_use]
pub fn uploading(file_name: &str) -> String {
    format!("Enviando arquivo: {file_name}")
}

/// Bot message for an accepted upload.
#[must_use]
pub fn upload_accepted(message: &str, columns: &[String]) -> String {
    format!(
        "{message}\n\nColunas detectadas: {}\n\nAgora você pode fazer perguntas sobre seus dados!",
        columns.join(", ")
    )
}
