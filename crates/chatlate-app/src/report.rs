use chatlate_types::{PipelineEvent, StopReason};
use kanal::AsyncReceiver;

/// Console sink: prints recognized and translated chat lines until the loop stops
pub async fn report_loop(rx: AsyncReceiver<PipelineEvent>) -> anyhow::Result<()> {
    while let Ok(event) = rx.recv().await {
        if let Some(line) = format_event(&event) {
            println!("{line}");
        }

        match event {
            PipelineEvent::Recognized { elapsed_ms, .. } => {
                tracing::debug!("OCR finished in {} ms", elapsed_ms);
            }
            PipelineEvent::Translated { provider, .. } => {
                tracing::debug!("Translated via {}", provider);
            }
            PipelineEvent::Stopped { .. } => break,
        }
    }

    Ok(())
}

pub fn format_event(event: &PipelineEvent) -> Option<String> {
    match event {
        PipelineEvent::Recognized {
            iteration, text, ..
        } => Some(format!("[{iteration}] {text}")),
        PipelineEvent::Translated {
            iteration,
            text,
            from_lang,
            to_lang,
            ..
        } => Some(format!("[{iteration}] ({from_lang} -> {to_lang}) {text}")),
        PipelineEvent::Stopped { reason } => match reason {
            StopReason::Failed(error) => Some(format!("Stopped: {error}")),
            StopReason::Completed | StopReason::Shutdown => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_translation() {
        let event = PipelineEvent::Translated {
            iteration: 3,
            original: "хорошая игра".to_string(),
            text: "good game".to_string(),
            from_lang: "ru".to_string(),
            to_lang: "en".to_string(),
            provider: "google".to_string(),
        };

        assert_eq!(
            format_event(&event).as_deref(),
            Some("[3] (ru -> en) good game")
        );
    }

    #[test]
    fn test_clean_stop_prints_nothing() {
        let event = PipelineEvent::Stopped {
            reason: StopReason::Completed,
        };
        assert!(format_event(&event).is_none());
    }

    #[tokio::test]
    async fn test_report_loop_ends_on_stop() {
        let (tx, rx) = kanal::unbounded_async();
        let handle = tokio::spawn(report_loop(rx));

        tx.send(PipelineEvent::Recognized {
            iteration: 1,
            text: "gg".to_string(),
            elapsed_ms: 12,
        })
        .await
        .unwrap();
        tx.send(PipelineEvent::Stopped {
            reason: StopReason::Shutdown,
        })
        .await
        .unwrap();

        let result = tokio::time::timeout(std::time::Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
    }
}
