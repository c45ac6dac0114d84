use crate::io::net::browser;
use crate::io::net::request_logger::RequestLogger;
use crate::pessoa::model::Pessoa;
use crate::pessoa::store::PessoaStore;
use crate::pessoa::validation::validate;
use crate::utils::ids::new_id;
use poem::{
    listener::{Listener, TcpListener},
    web::Data,
    Endpoint, EndpointExt, Route, Server,
};
use poem_openapi::{
    param::Path,
    payload::{Html, Json, PlainText},
    ApiResponse, Object, OpenApi, OpenApiService, Tags,
};
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;

pub const NOT_FOUND_MSG: &str = "Pessoa não encontrada.";
pub const INTERNAL_ERROR_MSG: &str = "Erro interno do servidor";
pub const MALFORMED_BODY_MSG: &str = "Corpo da requisição inválido.";
pub const UPDATED_MSG: &str = "Informações da pessoa atualizadas com sucesso.";
pub const DELETED_MSG: &str = "Pessoa excluída com sucesso.";

const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

pub struct HttpServerConfig {
    pub port: u16,
    pub interface: String,
    pub external_host: String,
    /// where the API docs UI lives, `None` to not serve it
    pub uipath: Option<String>,
    pub home_page: PathBuf,
    pub open_browser: bool,
}

impl HttpServerConfig {
    #[must_use]
    pub fn new(
        port: Option<u16>,
        interface: Option<String>,
        external_host: Option<String>,
        uipath: Option<String>,
        home_page: Option<PathBuf>,
    ) -> Self {
        let port = port.unwrap_or(3000);
        Self {
            port,
            interface: interface.unwrap_or_else(|| "127.0.0.1".to_string()),
            external_host: external_host.unwrap_or_else(|| format!("http://localhost:{port}")),
            uipath,
            home_page: home_page.unwrap_or_else(|| PathBuf::from("public/home.html")),
            open_browser: false,
        }
    }
}

impl fmt::Display for HttpServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "[{}:{} as {} docs: {} home: {}]",
            self.interface,
            self.port,
            self.external_host,
            self.uipath.as_deref().unwrap_or("off"),
            self.home_page.display()
        )
    }
}

#[derive(Tags)]
enum ApiTags {
    /// Cadastro de pessoas
    Pessoas,
}

/// Body of `POST /pessoa` and `PUT /pessoa/:id`.  The parser only insists on
/// a JSON object; missing or wrongly typed fields are left to validation.
#[derive(Object, Debug)]
pub struct PessoaInput {
    /// Nome da pessoa (texto).
    pub nome: Option<Value>,
    /// Idade da pessoa (número inteiro).
    pub idade: Option<Value>,
}

#[derive(Object, Debug)]
pub struct Mensagem {
    /// Mensagem de sucesso ou de erro.
    pub mensagem: String,
}

#[derive(Object, Debug)]
pub struct Cadastro {
    /// Mensagem de sucesso.
    pub mensagem: String,
    /// ID da pessoa cadastrada.
    pub id: String,
}

fn mensagem(text: impl Into<String>) -> Json<Mensagem> {
    Json(Mensagem {
        mensagem: text.into(),
    })
}

fn malformed_body(err: &poem::Error) -> Json<Mensagem> {
    debug!("rejecting malformed request: {err}");
    mensagem(MALFORMED_BODY_MSG)
}

#[derive(ApiResponse)]
#[oai(bad_request_handler = "create_bad_request")]
pub enum CreatePessoaResponse {
    /// Pessoa cadastrada com sucesso.
    #[oai(status = 201)]
    Created(Json<Cadastro>),

    /// Dados inválidos.
    #[oai(status = 400)]
    BadRequest(Json<Mensagem>),

    /// Erro interno do servidor.
    #[oai(status = 500)]
    InternalServerError(Json<Mensagem>),
}

#[allow(clippy::needless_pass_by_value)]
fn create_bad_request(err: poem::Error) -> CreatePessoaResponse {
    CreatePessoaResponse::BadRequest(malformed_body(&err))
}

#[derive(ApiResponse)]
pub enum ListPessoasResponse {
    /// Sucesso. Retorna a lista de pessoas.
    #[oai(status = 200)]
    Pessoas(Json<Vec<Pessoa>>),

    /// Erro interno do servidor.
    #[oai(status = 500)]
    InternalServerError(Json<Mensagem>),
}

#[derive(ApiResponse)]
pub enum GetPessoaResponse {
    /// Sucesso. Retorna os detalhes da pessoa encontrada.
    #[oai(status = 200)]
    Pessoa(Json<Pessoa>),

    /// Pessoa não encontrada.
    #[oai(status = 404)]
    NotFound(Json<Mensagem>),

    /// Erro interno do servidor.
    #[oai(status = 500)]
    InternalServerError(Json<Mensagem>),
}

#[derive(ApiResponse)]
#[oai(bad_request_handler = "update_bad_request")]
pub enum UpdatePessoaResponse {
    /// Informações da pessoa atualizadas com sucesso.
    #[oai(status = 200)]
    Updated(Json<Mensagem>),

    /// Dados inválidos.
    #[oai(status = 400)]
    BadRequest(Json<Mensagem>),

    /// Pessoa não encontrada.
    #[oai(status = 404)]
    NotFound(Json<Mensagem>),

    /// Erro interno do servidor.
    #[oai(status = 500)]
    InternalServerError(Json<Mensagem>),
}

#[allow(clippy::needless_pass_by_value)]
fn update_bad_request(err: poem::Error) -> UpdatePessoaResponse {
    UpdatePessoaResponse::BadRequest(malformed_body(&err))
}

#[derive(ApiResponse)]
pub enum DeletePessoaResponse {
    /// Pessoa excluída com sucesso.
    #[oai(status = 200)]
    Deleted(Json<Mensagem>),

    /// Pessoa não encontrada.
    #[oai(status = 404)]
    NotFound(Json<Mensagem>),

    /// Erro interno do servidor.
    #[oai(status = 500)]
    InternalServerError(Json<Mensagem>),
}

#[derive(ApiResponse)]
pub enum HomePageResponse {
    #[oai(status = 200)]
    Page(Html<String>),

    // plain text, unlike the json error bodies of the api routes
    #[oai(status = 500)]
    InternalServerError(PlainText<String>),
}

pub struct PessoasApi {
    home_page: PathBuf,
}

impl PessoasApi {
    #[must_use]
    pub const fn new(home_page: PathBuf) -> Self {
        Self { home_page }
    }
}

#[OpenApi]
impl PessoasApi {
    /// Cadastrar uma pessoa.
    #[oai(path = "/pessoa", method = "post", tag = "ApiTags::Pessoas")]
    async fn create_pessoa(
        &self,
        store: Data<&PessoaStore>,
        body: Json<PessoaInput>,
    ) -> CreatePessoaResponse {
        let input = body.0;
        let valid = match validate(input.nome.as_ref(), input.idade.as_ref()) {
            Ok(valid) => valid,
            Err(e) => {
                debug!("invalid pessoa {input:?}: {e:?}");
                return CreatePessoaResponse::BadRequest(mensagem(e.to_string()));
            }
        };

        let id = new_id();
        let nome = valid.nome.to_string();
        debug!("insert pessoa {id}");
        match store.insert(id.clone(), nome.clone(), valid.idade).await {
            Ok(()) => CreatePessoaResponse::Created(Json(Cadastro {
                mensagem: format!("{nome} cadastrado(a) com sucesso!"),
                id,
            })),
            Err(e) => {
                error!("can not insert pessoa {id}: {e}");
                CreatePessoaResponse::InternalServerError(mensagem(INTERNAL_ERROR_MSG))
            }
        }
    }

    /// Retorna todas as pessoas.
    #[oai(path = "/pessoa", method = "get", tag = "ApiTags::Pessoas")]
    async fn list_pessoas(&self, store: Data<&PessoaStore>) -> ListPessoasResponse {
        match store.list_all().await {
            Ok(pessoas) => ListPessoasResponse::Pessoas(Json(pessoas)),
            Err(e) => {
                error!("can not list pessoas: {e}");
                ListPessoasResponse::InternalServerError(mensagem(INTERNAL_ERROR_MSG))
            }
        }
    }

    /// Retorna uma pessoa pelo ID.
    #[oai(path = "/pessoa/:id", method = "get", tag = "ApiTags::Pessoas")]
    async fn get_pessoa(&self, store: Data<&PessoaStore>, id: Path<String>) -> GetPessoaResponse {
        match store.get_by_id(&id.0).await {
            Ok(Some(pessoa)) => GetPessoaResponse::Pessoa(Json(pessoa)),
            Ok(None) => {
                debug!("no pessoa {}", id.0);
                GetPessoaResponse::NotFound(mensagem(NOT_FOUND_MSG))
            }
            Err(e) => {
                error!("can not get pessoa {}: {e}", id.0);
                GetPessoaResponse::InternalServerError(mensagem(INTERNAL_ERROR_MSG))
            }
        }
    }

    /// Atualizar informações de uma pessoa por ID.
    #[oai(path = "/pessoa/:id", method = "put", tag = "ApiTags::Pessoas")]
    async fn update_pessoa(
        &self,
        store: Data<&PessoaStore>,
        id: Path<String>,
        body: Json<PessoaInput>,
    ) -> UpdatePessoaResponse {
        let input = body.0;
        let valid = match validate(input.nome.as_ref(), input.idade.as_ref()) {
            Ok(valid) => valid,
            Err(e) => {
                debug!("invalid update of pessoa {} {input:?}: {e:?}", id.0);
                return UpdatePessoaResponse::BadRequest(mensagem(e.to_string()));
            }
        };

        match store
            .update_by_id(&id.0, valid.nome.to_string(), valid.idade)
            .await
        {
            Ok(0) => {
                debug!("no pessoa {} to update", id.0);
                UpdatePessoaResponse::NotFound(mensagem(NOT_FOUND_MSG))
            }
            Ok(_) => UpdatePessoaResponse::Updated(mensagem(UPDATED_MSG)),
            Err(e) => {
                error!("can not update pessoa {}: {e}", id.0);
                UpdatePessoaResponse::InternalServerError(mensagem(INTERNAL_ERROR_MSG))
            }
        }
    }

    /// Exclui uma pessoa pelo ID.
    #[oai(path = "/pessoa/:id", method = "delete", tag = "ApiTags::Pessoas")]
    async fn delete_pessoa(
        &self,
        store: Data<&PessoaStore>,
        id: Path<String>,
    ) -> DeletePessoaResponse {
        match store.delete_by_id(&id.0).await {
            Ok(0) => {
                debug!("no pessoa {} to delete", id.0);
                DeletePessoaResponse::NotFound(mensagem(NOT_FOUND_MSG))
            }
            Ok(_) => DeletePessoaResponse::Deleted(mensagem(DELETED_MSG)),
            Err(e) => {
                error!("can not delete pessoa {}: {e}", id.0);
                DeletePessoaResponse::InternalServerError(mensagem(INTERNAL_ERROR_MSG))
            }
        }
    }

    #[oai(path = "/", method = "get", hidden)]
    async fn home_page(&self) -> HomePageResponse {
        match tokio::fs::read_to_string(&self.home_page).await {
            Ok(page) => HomePageResponse::Page(Html(page)),
            Err(e) => {
                error!("can not read {}: {e}", self.home_page.display());
                HomePageResponse::InternalServerError(PlainText(INTERNAL_ERROR_MSG.to_string()))
            }
        }
    }
}

/// the OpenAPI service for the routes above, described for the docs UI
#[must_use]
pub fn api_service(server_config: &HttpServerConfig) -> OpenApiService<PessoasApi, ()> {
    OpenApiService::new(
        PessoasApi::new(server_config.home_page.clone()),
        "API Pessoas",
        clap::crate_version!(),
    )
    .description("API para cadastrar, listar, atualizar e excluir pessoas.")
    .server(server_config.external_host.clone())
}

/// the whole http surface: api routes, docs, and request logging
pub fn build_app(store: PessoaStore, server_config: &HttpServerConfig) -> impl Endpoint {
    let api_service = api_service(server_config);

    let mut app = Route::new();
    if let Some(uipath) = &server_config.uipath {
        let uip = uipath.trim_matches('/');
        if !uip.is_empty() {
            app = app
                .at(format!("/{uip}.json"), api_service.spec_endpoint())
                .nest(format!("/{uip}"), api_service.swagger_ui());
        }
    }

    app.nest("/", api_service).data(store).with(RequestLogger)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        // without a signal handler the server runs until killed
        warn!("can not listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

/// start a server on port and interface, close the store when it stops
///
/// # Errors
///
/// Returns `Err` if server can not be started
pub async fn serve(store: PessoaStore, server_config: HttpServerConfig) -> Result<(), std::io::Error> {
    info!("starting server: {server_config}");

    let app = build_app(store.clone(), &server_config);
    let ifc_host_str = format!("{}:{}", server_config.interface, server_config.port);
    let acceptor = TcpListener::bind(ifc_host_str).into_acceptor().await?;

    info!("Servidor rodando em {}", server_config.external_host);
    if let Some(uipath) = &server_config.uipath {
        info!(
            "API docs available at {}/{}",
            server_config.external_host,
            uipath.trim_matches('/')
        );
    }
    if server_config.open_browser {
        browser::open_in_background(server_config.external_host.clone());
    }

    let result = Server::new_with_acceptor(acceptor)
        .run_with_graceful_shutdown(app, shutdown_signal(), Some(SHUTDOWN_GRACE))
        .await;

    if let Err(e) = store.shutdown().await {
        warn!("can not shut the store down cleanly: {e}");
    }
    result
}
