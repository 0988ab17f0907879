//! Home route: intake, clarifying questions, result and feedback.

use console::style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use shared::feedback::answer_paragraphs;
use shared::models::QuestionKind;
use shared::{FeedbackState, FlowStep, HomeSession, HomieClient, PhaseKind, QuestionFlow, SubmitOutcome};
use tracing::debug;

use crate::render;
use crate::ui::{print_error, print_info, print_success, spawn_phase_spinner, title};

pub async fn run(client: HomieClient) -> anyhow::Result<()> {
    let mut session = HomeSession::new(client);
    let spinner = spawn_phase_spinner(session.subscribe());
    let theme = ColorfulTheme::default();

    title("HomieFixie");
    println!("Describe a home repair issue or attach a photo to get a complete plan.");
    render::recent_projects(&session.recent_projects().await);

    loop {
        let keep_going = match session.phase_kind() {
            PhaseKind::Idle => intake(&mut session, &theme).await?,
            PhaseKind::AwaitingAnswers => questions(&mut session, &theme).await?,
            PhaseKind::ShowingResult => result_menu(&mut session, &theme).await?,
            phase => {
                debug!(?phase, "Request phase outlived its call");
                false
            }
        };
        if !keep_going {
            break;
        }
    }

    spinner.abort();
    Ok(())
}

/// Give the spinner task a chance to clear before printing.
async fn settle() {
    tokio::task::yield_now().await;
}

async fn intake(session: &mut HomeSession, theme: &ColorfulTheme) -> anyhow::Result<bool> {
    let mut items = vec!["Describe the issue", "Attach a photo"];
    if session.form().image().is_some() {
        items.push("Remove the photo");
    }
    items.push("Get help");
    items.push("Quit");

    let default = if session.form().has_input() { items.len() - 2 } else { 0 };
    let choice = Select::with_theme(theme)
        .with_prompt("What would you like to do?")
        .items(&items)
        .default(default)
        .interact()?;

    match items[choice] {
        "Describe the issue" => {
            let description: String = Input::with_theme(theme)
                .with_prompt("Describe your home repair issue")
                .with_initial_text(session.form().description())
                .allow_empty(true)
                .interact_text()?;
            let form = session.form_mut();
            form.set_description(description);
            form.clear_error();
        }
        "Attach a photo" => {
            let path: String = Input::with_theme(theme)
                .with_prompt("Path to a photo")
                .allow_empty(true)
                .interact_text()?;
            if !path.trim().is_empty() {
                match session.form_mut().select_image(path.trim()).await {
                    Ok(()) => {
                        if let Some(url) = session.form().preview_url() {
                            print_success(&format!("Photo attached. Preview: {}", url));
                        }
                    }
                    Err(e) => print_error(&e.user_message()),
                }
            }
        }
        "Remove the photo" => {
            session.form_mut().clear_image();
            print_info("Photo removed");
        }
        "Get help" => {
            let outcome = session.submit().await;
            settle().await;
            match outcome {
                Ok(SubmitOutcome::Analyzed) => show_result(session),
                Ok(SubmitOutcome::QuestionsReady) => {}
                Err(e) => print_error(&e.user_message()),
            }
        }
        _ => return Ok(false),
    }
    Ok(true)
}

fn question_header(flow: &QuestionFlow) {
    let question = flow.current_question();
    println!();
    println!(
        "{}",
        style(format!(
            "Question {} of {} ({}% complete)",
            flow.index() + 1,
            flow.len(),
            flow.progress_percent()
        ))
        .dim()
    );
    let optional = if question.required { "" } else { " (optional)" };
    println!("{}{}", style(&question.question).bold(), style(optional).dim());
}

async fn questions(session: &mut HomeSession, theme: &ColorfulTheme) -> anyhow::Result<bool> {
    let Some(flow) = session.question_flow_mut() else {
        return Ok(true);
    };
    if flow.index() == 0 && flow.answers().is_empty() {
        title(&format!("A few questions about your {} project", flow.category()));
    }
    question_header(flow);

    let question = flow.current_question().clone();
    let current = flow.current_answer().map(str::to_string);
    match question.kind {
        QuestionKind::Text => {
            let answer: String = Input::with_theme(theme)
                .with_prompt("Your answer")
                .with_initial_text(current.unwrap_or_default())
                .allow_empty(true)
                .interact_text()?;
            flow.answer(answer)?;
        }
        QuestionKind::MultipleChoice | QuestionKind::YesNo => {
            let choices = QuestionFlow::choices(&question);
            let default = current
                .as_deref()
                .and_then(|a| choices.iter().position(|c| c == a))
                .unwrap_or(0);
            let choice = Select::with_theme(theme)
                .items(&choices)
                .default(default)
                .interact()?;
            flow.answer(choices[choice].clone())?;
        }
    }

    if flow.is_last() {
        let recap = flow.labelled_answers();
        if !recap.is_empty() {
            println!("{}", style(recap.trim_start()).dim());
        }
    }

    let mut items = vec![if flow.is_last() { "Get my plan" } else { "Next" }];
    if flow.index() > 0 {
        items.push("Back");
    }
    items.push("Skip questions");

    let choice = Select::with_theme(theme).items(&items).default(0).interact()?;
    match items[choice] {
        "Back" => {
            flow.back();
        }
        "Skip questions" => {
            let outcome = session.skip_questions().await;
            settle().await;
            match outcome {
                Ok(_) => show_result(session),
                Err(e) => print_error(&e.user_message()),
            }
        }
        _ => match session.next_question().await {
            Ok(FlowStep::Submit(_)) => {
                settle().await;
                show_result(session);
            }
            Ok(_) => {}
            Err(e) => {
                settle().await;
                print_error(&e.user_message());
            }
        },
    }
    Ok(true)
}

fn show_result(session: &HomeSession) {
    if let Some(result) = session.result() {
        render::result(result.view());
    }
}

async fn result_menu(session: &mut HomeSession, theme: &ColorfulTheme) -> anyhow::Result<bool> {
    let Some(result) = session.result() else {
        return Ok(true);
    };

    let feedback_state = result.feedback().state();
    let mut items = Vec::new();
    match feedback_state {
        FeedbackState::NoFeedback => {
            items.push("This was helpful");
            items.push("This was not helpful");
        }
        FeedbackState::Thanked(_) => items.push("Change my feedback"),
        FeedbackState::AwaitingComment => {}
    }
    items.push(if result.followup().asked() > 0 {
        "Ask another question"
    } else {
        "Ask a follow-up question"
    });
    items.extend(["Show the plan again", "Start over", "Quit"]);

    let choice = Select::with_theme(theme)
        .with_prompt("Was this plan helpful?")
        .items(&items)
        .default(0)
        .interact()?;

    match items[choice] {
        "This was helpful" => {
            session.mark_helpful().await?;
            print_success("Thanks for your feedback!");
        }
        "This was not helpful" => {
            session.mark_not_helpful()?;
            not_helpful_comment(session, theme).await?;
        }
        "Change my feedback" => session.reset_feedback()?,
        "Ask a follow-up question" | "Ask another question" => {
            follow_up(session, theme).await?;
        }
        "Show the plan again" => show_result(session),
        "Start over" => session.start_over(),
        _ => return Ok(false),
    }
    Ok(true)
}

async fn not_helpful_comment(
    session: &mut HomeSession,
    theme: &ColorfulTheme,
) -> anyhow::Result<()> {
    loop {
        let text: String = Input::with_theme(theme)
            .with_prompt("What could be better? (optional)")
            .allow_empty(true)
            .interact_text()?;

        let choice = Select::with_theme(theme)
            .items(&["Send feedback", "Cancel"])
            .default(0)
            .interact()?;
        if choice == 1 {
            session.cancel_feedback()?;
            return Ok(());
        }

        match session.submit_feedback_comment(&text).await {
            Ok(()) => {
                print_success("Thanks, we'll use this to improve our recommendations.");
                return Ok(());
            }
            Err(e) => print_error(&e.user_message()),
        }
    }
}

async fn follow_up(session: &mut HomeSession, theme: &ColorfulTheme) -> anyhow::Result<()> {
    session.open_follow_up()?;
    let question: String = Input::with_theme(theme)
        .with_prompt("Your question (leave blank to cancel)")
        .allow_empty(true)
        .interact_text()?;

    if question.trim().is_empty() {
        session.cancel_follow_up()?;
        return Ok(());
    }

    match session.ask_follow_up(&question).await {
        Ok(answer) => {
            println!();
            for paragraph in answer_paragraphs(&answer) {
                println!("{}", paragraph);
                println!();
            }
        }
        Err(e) => print_error(&e.user_message()),
    }
    Ok(())
}
