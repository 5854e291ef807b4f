mod notes;

pub(crate) use notes::HomePage;

use crate::components::ui::{
    Button, ButtonSize, ButtonVariant, Card, CardContent, CardDescription, CardFooter,
    CardHeader, CardTitle, ErrorAlert, Input, Label, Spinner, Toaster,
};
use crate::state::{AppContext, REGISTER_FALLBACK};
use crate::util::check_passwords_match;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::Redirect;
use leptos_router::hooks::use_navigate;

#[component]
pub fn Navbar() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let auth = app_state.0.auth;
    let notes = app_state.0.notes;
    let toaster = expect_context::<Toaster>();
    let navigate = StoredValue::new(use_navigate());

    let on_logout = move |_: web_sys::MouseEvent| {
        auth.logout();
        notes.reset();
        toaster.success("Logged out successfully!");
        navigate.with_value(|nav| nav("/login", Default::default()));
    };

    view! {
        <header class="border-b bg-primary text-primary-foreground shadow-sm">
            <nav class="mx-auto flex w-full max-w-[1080px] items-center justify-between px-4 py-3">
                <a href="/" class="text-lg font-semibold">"Keep Notes"</a>

                <Show
                    when=move || auth.is_authenticated()
                    fallback=|| view! {
                        <div class="flex items-center gap-4 text-sm">
                            <a href="/register">"Register"</a>
                            <a href="/login">"Login"</a>
                        </div>
                    }
                >
                    <Button
                        variant=ButtonVariant::Secondary
                        size=ButtonSize::Sm
                        attr:disabled=move || auth.is_loading()
                        on:click=on_logout
                    >
                        {move || if auth.is_loading() { "Logging out..." } else { "Logout" }}
                    </Button>
                </Show>
            </nav>
        </header>
    }
}

/// Renders `children` for signed-in users; everyone else is sent to `/login`.
#[component]
pub fn RootAuthed(children: ChildrenFn) -> impl IntoView {
    let auth = expect_context::<AppContext>().0.auth;

    // Store children so the view macro sees an `Fn` (not an `FnOnce`).
    let children = StoredValue::new(children);

    view! {
        <Show when=move || auth.is_authenticated() fallback=|| view! { <Redirect path="/login" /> }>
            {move || children.with_value(|c| c())}
        </Show>
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let email: RwSignal<String> = RwSignal::new(String::new());
    let password: RwSignal<String> = RwSignal::new(String::new());

    let auth = expect_context::<AppContext>().0.auth;
    let navigate = StoredValue::new(use_navigate());

    // Errors from a previous visit (or the register page) are stale here.
    auth.clear_error();

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let email_val = email.get_untracked();
        let password_val = password.get_untracked();

        spawn_local(async move {
            if auth.login(email_val, password_val).await.is_ok() {
                navigate.with_value(|nav| nav("/", Default::default()));
            }
        });
    };

    view! {
        <div class="mx-auto flex w-full max-w-md flex-col justify-center px-4 py-12">
            <Card>
                <CardHeader>
                    <CardTitle class="text-xl">"Login"</CardTitle>
                    <CardDescription>"Welcome back to Keep Notes"</CardDescription>
                </CardHeader>

                <CardContent>
                    <form class="flex flex-col gap-4" on:submit=on_submit>
                        <ErrorAlert error=Signal::derive(move || auth.error()) />

                        <div class="flex flex-col gap-2">
                            <Label html_for="email">"Email address"</Label>
                            <Input
                                id="email"
                                r#type="email"
                                placeholder="Enter email"
                                autocomplete="email"
                                bind_value=email
                                required=true
                            />
                        </div>

                        <div class="flex flex-col gap-2">
                            <Label html_for="password">"Password"</Label>
                            <Input
                                id="password"
                                r#type="password"
                                placeholder="Password"
                                autocomplete="current-password"
                                bind_value=password
                                required=true
                            />
                        </div>

                        <Button class="w-full" attr:disabled=move || auth.is_loading()>
                            <span class="inline-flex items-center gap-2">
                                <Show when=move || auth.is_loading() fallback=|| ().into_view()>
                                    <Spinner />
                                </Show>
                                {move || if auth.is_loading() { "Logging in..." } else { "Login" }}
                            </span>
                        </Button>
                    </form>
                </CardContent>

                <CardFooter class="justify-center">
                    <div class="text-xs text-muted-foreground">
                        "Don't have an account? "
                        <a class="text-primary underline underline-offset-4" href="/register">"Register here"</a>
                    </div>
                </CardFooter>
            </Card>
        </div>
    }
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let username: RwSignal<String> = RwSignal::new(String::new());
    let email: RwSignal<String> = RwSignal::new(String::new());
    let password: RwSignal<String> = RwSignal::new(String::new());
    let confirm_password: RwSignal<String> = RwSignal::new(String::new());

    let auth = expect_context::<AppContext>().0.auth;
    let toaster = expect_context::<Toaster>();
    let navigate = StoredValue::new(use_navigate());

    auth.clear_error();

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let username_val = username.get_untracked();
        let email_val = email.get_untracked();
        let password_val = password.get_untracked();

        // Validation never reaches the store.
        if let Err(msg) = check_passwords_match(&password_val, &confirm_password.get_untracked()) {
            toaster.error(msg);
            return;
        }

        spawn_local(async move {
            match auth.register(username_val, email_val, password_val).await {
                Ok(()) => {
                    toaster.success("Registration successful! Please login.");
                    navigate.with_value(|nav| nav("/login", Default::default()));
                }
                Err(e) => toaster.error(e.message_or(REGISTER_FALLBACK)),
            }
        });
    };

    view! {
        <div class="mx-auto flex w-full max-w-md flex-col justify-center px-4 py-12">
            <Card>
                <CardHeader>
                    <CardTitle class="text-xl">"Create Account"</CardTitle>
                    <CardDescription>"Join Keep Notes today"</CardDescription>
                </CardHeader>

                <CardContent>
                    <form class="flex flex-col gap-4" on:submit=on_submit>
                        <div class="flex flex-col gap-2">
                            <Label html_for="username">"Username"</Label>
                            <Input
                                id="username"
                                placeholder="Enter username"
                                autocomplete="username"
                                bind_value=username
                                required=true
                            />
                        </div>

                        <div class="flex flex-col gap-2">
                            <Label html_for="email">"Email address"</Label>
                            <Input
                                id="email"
                                r#type="email"
                                placeholder="Enter email"
                                autocomplete="email"
                                bind_value=email
                                required=true
                            />
                        </div>

                        <div class="flex flex-col gap-2">
                            <Label html_for="password">"Password"</Label>
                            <Input
                                id="password"
                                r#type="password"
                                placeholder="Create password"
                                autocomplete="new-password"
                                bind_value=password
                                required=true
                            />
                        </div>

                        <div class="flex flex-col gap-2">
                            <Label html_for="confirm_password">"Confirm Password"</Label>
                            <Input
                                id="confirm_password"
                                r#type="password"
                                placeholder="Confirm password"
                                autocomplete="new-password"
                                bind_value=confirm_password
                                required=true
                            />
                        </div>

                        <Button class="w-full" attr:disabled=move || auth.is_loading()>
                            <span class="inline-flex items-center gap-2">
                                <Show when=move || auth.is_loading() fallback=|| ().into_view()>
                                    <Spinner />
                                </Show>
                                {move || if auth.is_loading() { "Registering..." } else { "Create Account" }}
                            </span>
                        </Button>
                    </form>
                </CardContent>

                <CardFooter class="justify-center">
                    <div class="text-xs text-muted-foreground">
                        "Already have an account? "
                        <a class="text-primary underline underline-offset-4" href="/login">"Login here"</a>
                    </div>
                </CardFooter>
            </Card>
        </div>
    }
}
