use crate::components::ui::{Toaster, Toasts};
use crate::config::EnvConfig;
use crate::pages::{HomePage, LoginPage, Navbar, RegisterPage, RootAuthed};
use crate::state::{AppContext, AppState};
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

#[component]
pub fn App() -> impl IntoView {
    let config = EnvConfig::new();
    provide_context(AppContext(AppState::new(&config)));
    provide_context(Toaster::new());

    // Navbar calls `use_navigate`, so it has to sit inside <Router>.
    view! {
        <Router>
            <div class="min-h-screen bg-background">
                <Navbar />
                <main>
                    <Routes fallback=|| view! { <div class="px-4 py-8 text-xs text-muted-foreground">"Not found"</div> }>
                        <Route path=path!("login") view=LoginPage />
                        <Route path=path!("register") view=RegisterPage />
                        <Route path=path!("") view=move || view! {
                            <RootAuthed>
                                <HomePage />
                            </RootAuthed>
                        } />
                    </Routes>
                </main>
                <Toasts />
            </div>
        </Router>
    }
}
