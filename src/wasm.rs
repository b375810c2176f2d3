#![cfg(target_arch = "wasm32")]

use gloo_timers::callback::Interval;
use leptos::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen_futures::JsFuture;

use crate::{
    Feedback, QuestionBank, Session, SessionAction, Ticker, TimerHandle, Transition, builtin_bank,
};

const SERVICE_WORKER_PATH: &str = "service-worker.js";

impl TimerHandle for Interval {
    fn cancel(self) {
        let _ = Interval::cancel(self);
    }
}

fn now_millis() -> u64 {
    js_sys::Date::now() as u64
}

/// Page entry point: logging, panic hook, offline cache, then the quiz.
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    register_service_worker();
    mount_to_body(|| view! { <App /> });
}

fn register_service_worker() {
    let promise = leptos::window()
        .navigator()
        .service_worker()
        .register(SERVICE_WORKER_PATH);

    spawn_local(async move {
        match JsFuture::from(promise).await {
            Ok(_) => log::info!("service worker registered from {}", SERVICE_WORKER_PATH),
            Err(error) => log::warn!("service worker registration failed: {:?}", error),
        }
    });
}

#[component]
fn App() -> impl IntoView {
    match builtin_bank() {
        Ok(bank) => view! { <Quiz bank=bank /> }.into_view(),
        Err(error) => {
            log::error!("{}", error);
            view! {
                <section class="error-card">
                    <p class="eyebrow">"Question data error"</p>
                    <p class="error-body">{error.to_string()}</p>
                </section>
            }
            .into_view()
        }
    }
}

#[component]
fn Quiz(bank: QuestionBank) -> impl IntoView {
    let tick_millis = bank.settings().tick_millis;
    let session = create_rw_signal(Session::new(&bank, StdRng::from_entropy()));
    let ticker: Rc<RefCell<Ticker<Interval>>> = Rc::new(RefCell::new(Ticker::new()));

    let restart_ticker = {
        let ticker = Rc::clone(&ticker);

        move || {
            let interval = Interval::new(tick_millis, move || {
                session.update(|state| {
                    state.dispatch(SessionAction::Tick);
                });
            });
            ticker.borrow_mut().start(interval);
        }
    };

    restart_ticker();

    {
        let ticker = Rc::clone(&ticker);
        on_cleanup(move || ticker.borrow_mut().stop());
    }

    let on_action = {
        let ticker = Rc::clone(&ticker);

        Callback::new(move |action: SessionAction| {
            let transition = session
                .try_update(|state| state.dispatch(action))
                .unwrap_or(Transition::Ignored);

            match transition {
                Transition::QuestionChanged => restart_ticker(),
                Transition::Finished => ticker.borrow_mut().stop(),
                Transition::Ignored | Transition::Updated => {}
            }
        })
    };

    let finished = create_memo(move |_| session.with(|state| state.is_finished()));
    let dialog = create_memo(move |_| session.with(|state| state.dialog().cloned()));

    view! {
        <div class="quiz-wrapper">
            <QuizHeader session=session finished=finished />
            {move || {
                if finished.get() {
                    view! { <ResultCard session=session on_action=on_action /> }.into_view()
                } else {
                    view! { <QuestionCard session=session on_action=on_action /> }.into_view()
                }
            }}
            <FeedbackDialog
                dialog=dialog
                on_dismiss=Callback::new(move |_| on_action.call(SessionAction::DismissDialog))
            />
        </div>
    }
}

#[component]
fn QuizHeader(session: RwSignal<Session>, finished: Memo<bool>) -> impl IntoView {
    let elapsed = create_memo(move |_| session.with(|state| state.elapsed_seconds()));
    let score = create_memo(move |_| session.with(|state| state.score()));

    view! {
        <div class="header">
            <div class="timer">{move || format!("Time: {}s", elapsed.get())}</div>
            <div class="score">{move || format!("Correct: {}", score.get())}</div>
            <Show when=move || !finished.get()>
                <div class="stats">
                    <div class="correct-count">
                        {move || format!(
                            "Times answered correctly: {}",
                            session.with(|state| state.current_stats().correct_count)
                        )}
                    </div>
                    <div class="average-time">
                        {move || format!(
                            "Average answer time: {}",
                            session.with(|state| state.current_stats().average_age_label(now_millis()))
                        )}
                    </div>
                </div>
            </Show>
        </div>
    }
}

#[component]
fn QuestionCard(session: RwSignal<Session>, on_action: Callback<SessionAction>) -> impl IntoView {
    let position = create_memo(move |_| {
        session.with(|state| (state.current_index() + 1, state.total()))
    });
    let prompt = create_memo(move |_| session.with(|state| state.current_question().prompt.clone()));
    let hint = create_memo(move |_| session.with(|state| state.current_question().hint.clone()));
    let options = create_memo(move |_| session.with(|state| state.shuffled_options().to_vec()));
    let selected = create_memo(move |_| {
        session.with(|state| state.selected_option().map(str::to_string))
    });
    let hint_visible = create_memo(move |_| session.with(|state| state.hint_visible()));
    let can_advance = create_memo(move |_| session.with(|state| state.can_advance()));

    view! {
        <div class="content-wrapper">
            <p class="progress">
                {move || {
                    let (number, total) = position.get();
                    format!("Question {} of {}", number, total)
                }}
            </p>
            <div class="question-wrapper" inner_html=move || prompt.get()></div>

            <div class="options-wrapper">
                <ul class="options-list">
                    <For
                        each=move || options.get()
                        key=|option| option.clone()
                        children=move |option: String| {
                            let is_selected = {
                                let option = option.clone();
                                move || selected.get().as_deref() == Some(option.as_str())
                            };
                            let choice = option.clone();

                            view! {
                                <li>
                                    <button
                                        class="option-button"
                                        class:selected=is_selected.clone()
                                        aria-pressed=move || is_selected().to_string()
                                        on:click=move |_| on_action.call(SessionAction::Select(choice.clone()))
                                    >
                                        {option}
                                    </button>
                                </li>
                            }
                        }
                    />
                </ul>
            </div>

            <button
                class="next-button"
                class:disabled=move || !can_advance.get()
                disabled=move || !can_advance.get()
                on:click=move |_| {
                    on_action.call(SessionAction::Advance {
                        now_millis: now_millis(),
                    })
                }
            >
                "Next"
            </button>

            <Show when=move || hint_visible.get()>
                <div class="hint-wrapper">
                    <h3>"Hint"</h3>
                    <div inner_html=move || hint.get()></div>
                </div>
            </Show>
        </div>
    }
}

#[component]
fn ResultCard(session: RwSignal<Session>, on_action: Callback<SessionAction>) -> impl IntoView {
    let summary = create_memo(move |_| session.with(|state| state.summary()));

    view! {
        <div class="result">
            <h2>"Result"</h2>
            <p class="result-score">{move || format!("Score: {}", summary.get())}</p>
            <button class="reset-button" on:click=move |_| on_action.call(SessionAction::Restart)>
                "Restart"
            </button>
        </div>
    }
}

#[component]
fn FeedbackDialog(dialog: Memo<Option<Feedback>>, on_dismiss: Callback<()>) -> impl IntoView {
    move || {
        dialog.get().map(|feedback| {
            view! {
                <div
                    class="modal-overlay"
                    role="dialog"
                    aria-modal="true"
                    aria-label=feedback.title.clone()
                    on:click=move |_| on_dismiss.call(())
                >
                    <div class="modal" on:click=|event| event.stop_propagation()>
                        <h2>{feedback.title.clone()}</h2>
                        <div class="modal-content" inner_html=feedback.body.clone()></div>
                        <button class="btn" type="button" on:click=move |_| on_dismiss.call(())>
                            "OK"
                        </button>
                    </div>
                </div>
            }
        })
    }
}
