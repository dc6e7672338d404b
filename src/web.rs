use actix_web::{web, App, HttpServer, HttpResponse, Result, middleware};
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard};
use tracing::info;

use crate::display::RosterSheet;
use crate::error::RosterError;
use crate::export::{export_file_name, render_sheet, ExportFormat, ExportGuard};
use crate::parser::parse_member_names;
use crate::roster::{Member, MemberId, RosterSnapshot, RosterStats, RosterStore, SlotTarget, Team};

pub struct AppState {
    pub store: Mutex<RosterStore>,
    pub exports: ExportGuard,
}

impl AppState {
    pub fn new(store: RosterStore) -> Self {
        AppState {
            store: Mutex::new(store),
            exports: ExportGuard::default(),
        }
    }

    fn store(&self) -> std::result::Result<MutexGuard<'_, RosterStore>, RosterError> {
        self.store.lock().map_err(|_| RosterError::Lock)
    }
}

#[derive(Deserialize)]
pub struct AddMembersRequest {
    text: String,
}

#[derive(Deserialize)]
pub struct RenameRequest {
    name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    member_id: MemberId,
    team: Team,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceRequest {
    member_id: MemberId,
    target: SlotTarget,
}

#[derive(Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    format: ExportFormat,
}

/// Everything the board needs to draw itself
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterView {
    #[serde(flatten)]
    snapshot: RosterSnapshot,
    available_for_cars: Vec<Member>,
    stats: RosterStats,
    exporting: bool,
    changed: bool,
}

fn roster_view(state: &AppState, store: &RosterStore, changed: bool) -> RosterView {
    RosterView {
        snapshot: store.snapshot(),
        available_for_cars: store.available_for_cars().into_iter().cloned().collect(),
        stats: store.stats(),
        exporting: state.exports.is_busy(),
        changed,
    }
}

/// Runs one store operation and answers with the updated roster
fn mutate<F>(state: &AppState, op: F) -> Result<HttpResponse>
where
    F: FnOnce(&mut RosterStore) -> bool,
{
    let mut store = state.store()?;
    let changed = op(&mut store);
    Ok(HttpResponse::Ok().json(roster_view(state, &store, changed)))
}

async fn get_roster(state: web::Data<AppState>) -> Result<HttpResponse> {
    let store = state.store()?;
    Ok(HttpResponse::Ok().json(roster_view(&state, &store, false)))
}

async fn add_members(
    req: web::Json<AddMembersRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let names = parse_member_names(&req.text);
    mutate(&state, |store| !store.add_members(names).is_empty())
}

async fn rename_member(
    member_id: web::Path<String>,
    req: web::Json<RenameRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    mutate(&state, |store| store.rename_member(&member_id, &req.name))
}

async fn split_teams(state: web::Data<AppState>) -> Result<HttpResponse> {
    mutate(&state, |store| {
        store.split_teams();
        true
    })
}

async fn move_to_team(
    req: web::Json<MoveRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    mutate(&state, |store| store.move_to_team(&req.member_id, req.team))
}

async fn add_car(state: web::Data<AppState>) -> Result<HttpResponse> {
    mutate(&state, |store| {
        store.add_car();
        true
    })
}

async fn remove_car(
    car_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    mutate(&state, |store| store.remove_car(&car_id))
}

async fn add_passenger_slot(
    car_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    mutate(&state, |store| store.add_passenger_slot(&car_id))
}

async fn remove_passenger_slot(
    path: web::Path<(String, usize)>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let (car_id, index) = path.into_inner();
    mutate(&state, |store| store.remove_passenger_slot(&car_id, index))
}

async fn place_member(
    req: web::Json<PlaceRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    mutate(&state, |store| store.place_member(&req.member_id, &req.target))
}

async fn reset(state: web::Data<AppState>) -> Result<HttpResponse> {
    mutate(&state, |store| {
        store.reset();
        true
    })
}

// Sheet as of the moment the request arrives, as a dated download
async fn export_sheet(
    query: web::Query<ExportQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let format = query.format;
    let (file_name, body) = state.exports.run(|| {
        let sheet = RosterSheet::from_store(&*state.store()?);
        let body = render_sheet(&sheet, format)?;
        Ok((export_file_name(format, Local::now().date_naive()), body))
    })?;

    Ok(HttpResponse::Ok()
        .content_type(format.content_type())
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(file_name)],
        })
        .body(body))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/roster", web::get().to(get_roster))
        .route("/api/members", web::post().to(add_members))
        .route("/api/members/{id}", web::put().to(rename_member))
        .route("/api/split", web::post().to(split_teams))
        .route("/api/teams/move", web::post().to(move_to_team))
        .route("/api/cars", web::post().to(add_car))
        .route("/api/cars/{id}", web::delete().to(remove_car))
        .route("/api/cars/{id}/passengers", web::post().to(add_passenger_slot))
        .route("/api/cars/{id}/passengers/{index}", web::delete().to(remove_passenger_slot))
        .route("/api/place", web::post().to(place_member))
        .route("/api/reset", web::post().to(reset))
        .route("/api/export", web::get().to(export_sheet));
}

pub async fn start_server(bind: &str, port: u16, store: RosterStore) -> std::io::Result<()> {
    let app_state = web::Data::new(AppState::new(store));
    info!("Serving roster on http://{}:{}", bind, port);

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind((bind, port))?
    .run()
    .await
}
