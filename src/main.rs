use std::sync::RwLock;

use actix_cors::Cors;
use actix_web::{delete, get, post, web, App, HttpResponse, HttpServer};
use serde::{Deserialize, Serialize};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod balance;
mod ledger;
mod schemas;
mod settlement;

use crate::balance::compute_balances;
use crate::ledger::{Ledger, LedgerError};
use crate::schemas::PersonId;
use crate::settlement::compute_settlements;

type AppState = web::Data<RwLock<Ledger>>;

#[derive(Deserialize, Serialize)]
struct PersonNameJson {
    name: String,
}

#[derive(Deserialize, Serialize)]
struct NewExpenseJson {
    description: String,
    amount: f64,
    paid_by: PersonId,
    split_among: Vec<PersonId>,
}

fn error_response(err: LedgerError) -> HttpResponse {
    let body = serde_json::json!({ "error": err.to_string() });
    match err {
        LedgerError::UnknownPerson(_) | LedgerError::UnknownExpense(_) => {
            HttpResponse::NotFound().json(body)
        }
        _ => HttpResponse::BadRequest().json(body),
    }
}

#[get("/people")]
async fn list_people(state: AppState) -> HttpResponse {
    let ledger = state.read().unwrap();
    HttpResponse::Ok().json(ledger.people())
}

#[post("/people")]
async fn add_person(state: AppState, json: web::Json<PersonNameJson>) -> HttpResponse {
    let mut ledger = state.write().unwrap();
    match ledger.add_person(&json.name) {
        Ok(person) => {
            info!(id = %person.id, name = %person.name, "person added");
            HttpResponse::Ok().json(person)
        }
        Err(err) => error_response(err),
    }
}

#[delete("/people/{id}")]
async fn remove_person(state: AppState, id: web::Path<String>) -> HttpResponse {
    let mut ledger = state.write().unwrap();
    match ledger.remove_person(&id.into_inner()) {
        Ok(()) => HttpResponse::Ok().body("Person removed"),
        Err(err) => error_response(err),
    }
}

#[get("/expenses")]
async fn list_expenses(state: AppState) -> HttpResponse {
    let ledger = state.read().unwrap();
    HttpResponse::Ok().json(ledger.expenses())
}

#[post("/expenses")]
async fn add_expense(state: AppState, json: web::Json<NewExpenseJson>) -> HttpResponse {
    let mut ledger = state.write().unwrap();
    let json = json.into_inner();
    match ledger.add_expense(&json.description, json.amount, &json.paid_by, &json.split_among) {
        Ok(expense) => {
            info!(id = %expense.id, amount = expense.amount, "expense added");
            HttpResponse::Ok().json(expense)
        }
        Err(err) => error_response(err),
    }
}

#[delete("/expenses/{id}")]
async fn remove_expense(state: AppState, id: web::Path<String>) -> HttpResponse {
    let mut ledger = state.write().unwrap();
    match ledger.remove_expense(&id.into_inner()) {
        Ok(()) => HttpResponse::Ok().body("Expense removed"),
        Err(err) => error_response(err),
    }
}

#[get("/balances")]
async fn get_balances(state: AppState) -> HttpResponse {
    let ledger = state.read().unwrap();
    HttpResponse::Ok().json(compute_balances(ledger.people(), ledger.expenses()))
}

#[get("/settlements")]
async fn get_settlements(state: AppState) -> HttpResponse {
    let ledger = state.read().unwrap();
    let balances = compute_balances(ledger.people(), ledger.expenses());
    HttpResponse::Ok().json(compute_settlements(&balances))
}

#[delete("/ledger")]
async fn reset_ledger(state: AppState) -> HttpResponse {
    let mut ledger = state.write().unwrap();
    ledger.clear();
    HttpResponse::Ok().body("Ledger cleared")
}

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_people)
        .service(add_person)
        .service(remove_person)
        .service(list_expenses)
        .service(add_expense)
        .service(remove_expense)
        .service(get_balances)
        .service(get_settlements)
        .service(reset_ledger);
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let addr = std::env::var("FAIRSPLIT_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    info!("listening on {addr}");

    let state: AppState = web::Data::new(RwLock::new(Ledger::new()));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Cors::permissive())
            .configure(routes)
    })
    .bind(addr)?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::{Balance, Expense, Person, Settlement};
    use actix_web::{http::StatusCode, test};
    use std::collections::BTreeMap;

    macro_rules! service {
        () => {{
            let state: AppState = web::Data::new(RwLock::new(Ledger::new()));
            test::init_service(App::new().app_data(state).configure(routes)).await
        }};
    }

    macro_rules! post_person {
        ($app:expr, $name:expr) => {{
            let req = test::TestRequest::post()
                .uri("/people")
                .set_json(PersonNameJson {
                    name: $name.to_string(),
                })
                .to_request();
            let person: Person = test::call_and_read_body_json($app, req).await;
            person
        }};
    }

    #[actix_web::test]
    async fn full_split_flow() {
        let app = service!();
        let ana = post_person!(&app, "Ana");
        let bea = post_person!(&app, "Bea");
        let cruz = post_person!(&app, "Cruz");

        let req = test::TestRequest::post()
            .uri("/expenses")
            .set_json(NewExpenseJson {
                description: "dinner".to_string(),
                amount: 90.0,
                paid_by: ana.id.clone(),
                split_among: vec![ana.id.clone(), bea.id.clone(), cruz.id.clone()],
            })
            .to_request();
        let expense: Expense = test::call_and_read_body_json(&app, req).await;
        assert_eq!(expense.split_among.len(), 3);

        let req = test::TestRequest::get().uri("/balances").to_request();
        let balances: BTreeMap<String, Balance> = test::call_and_read_body_json(&app, req).await;
        assert!((balances[&ana.id].balance - 60.0).abs() < 1e-9);

        let req = test::TestRequest::get().uri("/settlements").to_request();
        let settlements: Vec<Settlement> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(settlements.len(), 2);
        for s in &settlements {
            assert_eq!(s.to, "Ana");
            assert!((s.amount - 30.0).abs() < 1e-9);
        }
    }

    #[actix_web::test]
    async fn removing_a_person_updates_the_settlements() {
        let app = service!();
        let ana = post_person!(&app, "Ana");
        let bea = post_person!(&app, "Bea");

        let req = test::TestRequest::post()
            .uri("/expenses")
            .set_json(NewExpenseJson {
                description: "taxi".to_string(),
                amount: 20.0,
                paid_by: ana.id.clone(),
                split_among: vec![ana.id.clone(), bea.id.clone()],
            })
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::delete()
            .uri(&format!("/people/{}", bea.id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri("/settlements").to_request();
        let settlements: Vec<Settlement> = test::call_and_read_body_json(&app, req).await;
        assert!(settlements.is_empty());
    }

    #[actix_web::test]
    async fn invalid_input_maps_to_client_errors() {
        let app = service!();
        let ana = post_person!(&app, "Ana");

        let req = test::TestRequest::post()
            .uri("/people")
            .set_json(PersonNameJson {
                name: "   ".to_string(),
            })
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/expenses")
            .set_json(NewExpenseJson {
                description: "taxi".to_string(),
                amount: 20.0,
                paid_by: "ghost".to_string(),
                split_among: vec![ana.id.clone()],
            })
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::delete()
            .uri("/expenses/ghost")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
