//! admin-console: line-oriented users & roles administration
//!
//! Commands:
//!   users [term]                 search users (debounced)
//!   roles [term]                 search roles (debounced)
//!   next|prev users|roles        page through a collection
//!   delete <user-id>             delete a user
//!   rename <role-id> <name> [description...]
//!   show                         print both tables
//!   dismiss                      clear the error banner
//!   quit

use std::path::PathBuf;

use admin_client::view::{ErrorBanner, Pager, RoleEditor, format_created_at, role_label};
use admin_client::{
    AdminStore, ClientConfig, CollectionKind, HttpClient, LoadParams, SearchBinding,
    StoreSnapshot, logger,
};
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into());
    let json = std::env::var("LOG_JSON")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(false);
    let log_dir = std::env::var("LOG_DIR").ok().map(PathBuf::from);
    logger::init_logger(&level, json, log_dir.as_deref())?;

    let config = ClientConfig::from_env();
    tracing::info!(base_url = %config.base_url, "Starting admin-console");

    let store = AdminStore::new(config.build_http_client()?);
    let banner = ErrorBanner::new();
    let user_search = SearchBinding::spawn(
        store.clone(),
        CollectionKind::Users,
        config.search_debounce(),
        banner.clone(),
    );
    let role_search = SearchBinding::spawn(
        store.clone(),
        CollectionKind::Roles,
        config.search_debounce(),
        banner.clone(),
    );

    tokio::spawn(render_loop(store.clone(), banner.clone()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            continue;
        };
        let rest: Vec<&str> = words.collect();

        match command {
            "users" => user_search.input(rest.join(" ")),
            "roles" => role_search.input(rest.join(" ")),
            "next" | "prev" => {
                let Some(kind) = rest.first().and_then(|w| parse_kind(w)) else {
                    println!("usage: {} users|roles", command);
                    continue;
                };
                let binding = match kind {
                    CollectionKind::Users => &user_search,
                    CollectionKind::Roles => &role_search,
                };
                turn_page(&store, &banner, binding, command == "next");
            }
            "delete" => match rest.first() {
                Some(id) => delete_user(&store, &banner, id),
                None => println!("usage: delete <user-id>"),
            },
            "rename" => match rest.as_slice() {
                [id, name, description @ ..] => {
                    rename_role(&store, &banner, id, name, &description.join(" ")).await
                }
                _ => println!("usage: rename <role-id> <name> [description...]"),
            },
            "show" => print_tables(&store.snapshot(), &banner),
            "dismiss" => banner.dismiss(),
            "quit" | "exit" => break,
            other => println!("unknown command: {}", other),
        }
    }

    user_search.stop().await;
    role_search.stop().await;
    Ok(())
}

fn parse_kind(word: &str) -> Option<CollectionKind> {
    match word {
        "users" => Some(CollectionKind::Users),
        "roles" => Some(CollectionKind::Roles),
        _ => None,
    }
}

fn turn_page<C: HttpClient + 'static>(
    store: &AdminStore<C>,
    banner: &ErrorBanner,
    search: &SearchBinding,
    forward: bool,
) {
    let kind = search.kind();
    let snapshot = store.snapshot();
    let params = match kind {
        CollectionKind::Users => page_params(&search.pager(&snapshot.users), forward),
        CollectionKind::Roles => page_params(&search.pager(&snapshot.roles), forward),
    };
    let Some(params) = params else {
        println!("no {} page in that direction", kind);
        return;
    };

    let store = store.clone();
    let banner = banner.clone();
    tokio::spawn(async move {
        if let Err(err) = store.load(kind, params).await {
            banner.report(&err);
        }
    });
}

fn page_params<T>(pager: &Pager<'_, T>, forward: bool) -> Option<LoadParams> {
    if forward { pager.next() } else { pager.previous() }
}

fn delete_user<C: HttpClient + 'static>(store: &AdminStore<C>, banner: &ErrorBanner, id: &str) {
    let Some(user) = store.users().data.into_iter().find(|u| u.id == id) else {
        println!("no loaded user with id {}", id);
        return;
    };

    let store = store.clone();
    let banner = banner.clone();
    tokio::spawn(async move {
        if let Err(err) = store.remove_user(&user).await {
            banner.report(&err);
        }
    });
}

async fn rename_role<C: HttpClient>(
    store: &AdminStore<C>,
    banner: &ErrorBanner,
    id: &str,
    name: &str,
    description: &str,
) {
    let roles = store.roles().data;
    let Some(role) = roles.iter().find(|r| r.id == id) else {
        println!("no loaded role with id {}", id);
        return;
    };

    let mut editor = RoleEditor::new();
    editor.open(role);
    editor.name = name.to_string();
    if !description.is_empty() {
        editor.description = description.to_string();
    }

    if let Err(reason) = editor.validate(&roles) {
        println!("cannot save: {}", reason);
        return;
    }
    if let Some(role) = editor.submit(store, banner).await {
        println!("role {} saved as \"{}\"", role.id, role.name);
    }
}

/// Reprint whenever committed data or the banner changes
async fn render_loop<C: HttpClient>(store: AdminStore<C>, banner: ErrorBanner) {
    let mut revisions = store.subscribe();
    let mut messages = banner.subscribe();
    let mut shown: Option<(StoreSnapshot, Option<String>)> = None;

    loop {
        // Failed loads notify the store before the caller reports to the
        // banner, so both sources trigger a redraw
        let changed = tokio::select! {
            changed = revisions.changed() => changed.is_ok(),
            changed = messages.changed() => changed.is_ok(),
        };
        if !changed {
            break;
        }

        let snapshot = store.snapshot();
        if snapshot.is_table_loading() || snapshot.is_updating_role {
            continue;
        }
        let current = (snapshot, banner.message());
        if shown.as_ref() != Some(&current) {
            print_tables(&current.0, &banner);
            shown = Some(current);
        }
    }
}

fn print_tables(snapshot: &StoreSnapshot, banner: &ErrorBanner) {
    let roles = &snapshot.roles.data;

    println!("== Users{}", search_suffix(snapshot.users.search()));
    for user in &snapshot.users.data {
        println!(
            "  {:<12} {:<28} {:<16} {}",
            user.id,
            user.display_name(),
            role_label(&user.role_id, roles),
            format_created_at(&user.created_at)
        );
    }
    print_pager(&Pager::new(&snapshot.users));

    println!("== Roles{}", search_suffix(snapshot.roles.search()));
    if roles.is_empty() {
        println!("  No roles found");
    }
    for role in roles {
        println!(
            "  {:<12} {:<20}{:<10} {:<36} {}",
            role.id,
            role.name,
            if role.is_default { " (default)" } else { "" },
            role.description.as_deref().unwrap_or(""),
            format_created_at(&role.created_at)
        );
    }
    print_pager(&Pager::new(&snapshot.roles));

    if let Some(message) = banner.message() {
        println!("!! {}  (type `dismiss` to clear)", message);
    }
}

fn search_suffix(search: Option<&str>) -> String {
    search.map(|s| format!(" matching \"{}\"", s)).unwrap_or_default()
}

fn print_pager<T>(pager: &Pager<'_, T>) {
    if pager.is_visible() {
        println!(
            "  [{}] [{}]",
            if pager.can_previous() { "prev" } else { "----" },
            if pager.can_next() { "next" } else { "----" },
        );
    }
}
