// src/pages/blob.rs
// =============================================================================
// Shows one file of a repository.
//
// What gets rendered depends on the file extension:
// 1. video (mp4, webm, mov, ...): the contents API gives a download URL,
//    shown as a video block plus a download link
// 2. image (png, svg, ...) stored as base64: an image block with its MIME type
// 3. anything else: the decoded text with line numbers, a copy button and
//    the language detected from the file name or first line (highlighted
//    when colours are on)
//
// If the contents entry of a video isn't a downloadable file, the page falls
// through to the blob as if it weren't a video.
// =============================================================================

use crate::github::types::{Blob, Contents};
use crate::github::{ErrorMsg, FetchOptions, LoadingMsg};
use crate::pages::{Page, Session};
use crate::route::Route;
use crate::view::highlight::detect_language;
use crate::view::{Action, Block, CodeView, CopyButton, Document, Icon, MessageKind};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::{debug, info};

const HEADER: &str = "header";
const MAIN: &str = "main";

const LOADING_ID: &str = "get-blob-content-loading-msg";
const ERROR_ID: &str = "get-blob-content-error-msg";

const VIDEO_EXTENSIONS: &[&str] = &[
    "3gp", "3g2", "mp4", "webm", "ogg", "ogv", "mov", "avi", "mkv", "mpeg", "mpg", "flv", "wmv",
    "m4v", "asf", "divx", "f4v", "m2v", "mpe", "vob", "rm", "rmvb", "swf", "qt", "avchd",
];

// Extensions that don't follow the "image/<ext>" pattern
const IMAGE_MIME_OVERRIDES: &[(&str, &str)] = &[
    ("svg", "image/svg+xml"),
    ("ico", "image/x-icon"),
    ("tiff", "image/tiff"),
    ("tif", "image/tiff"),
    ("avif", "image/avif"),
    ("apng", "image/apng"),
    ("jxl", "image/jxl"),
];

const PLAIN_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp"];

pub struct BlobPage {
    doc: Document,
}

impl BlobPage {
    pub async fn load(
        session: &Session,
        repo_name: &str,
        file_name: &str,
        url: &str,
        repo_url: &str,
        tree_url: Option<&str>,
    ) -> Self {
        let mut page = Self {
            doc: Document::with_sections(format!("{}: {}", repo_name, file_name), &[HEADER, MAIN]),
        };
        page.doc.push(
            HEADER,
            Block::link(
                None,
                repo_name,
                Action::Navigate(Route::Repo {
                    url: repo_url.to_string(),
                    repo_name: repo_name.to_string(),
                    tree_url: tree_url.map(str::to_string),
                    sha: None,
                }),
            ),
        );

        let extension = file_extension(file_name);
        debug!(file = file_name, extension = ?extension, "rendering file");

        if let Some(ext) = extension.as_deref() {
            if VIDEO_EXTENSIONS.contains(&ext) {
                let contents_url = session.fetcher.contents_url(repo_name, file_name);
                let options = FetchOptions::default()
                    .loading(LoadingMsg::new(MAIN, LOADING_ID))
                    .error(ErrorMsg::new(
                        MAIN,
                        ERROR_ID,
                        "can't get this video at the moment",
                    ));
                let Ok(contents) = session
                    .fetcher
                    .fetch_data::<Contents>(&mut page.doc, &contents_url, options)
                    .await
                else {
                    return page;
                };
                if let Some(download_url) = video_download(&contents) {
                    page.doc.push(MAIN, Block::Video { url: download_url.clone() });
                    page.doc.push(
                        MAIN,
                        Block::link(
                            Some(Icon::Download),
                            "Download Video",
                            Action::External(download_url),
                        ),
                    );
                    return page;
                }
                debug!(file = file_name, "no downloadable video, showing the blob");
            }
        }

        let options = FetchOptions::default()
            .loading(LoadingMsg::new(MAIN, LOADING_ID))
            .error(ErrorMsg::new(
                MAIN,
                ERROR_ID,
                "can't get this file at the moment",
            ));
        let Ok(blob) = session
            .fetcher
            .fetch_data::<Blob>(&mut page.doc, url, options)
            .await
        else {
            return page;
        };

        let is_base64 = blob.encoding == "base64";
        let bytes = if is_base64 {
            match decode_base64(&blob.content) {
                Ok(bytes) => bytes,
                Err(e) => {
                    debug!(file = file_name, error = %e, "invalid base64");
                    page.doc.show_msg(
                        MAIN,
                        ERROR_ID,
                        MessageKind::Error,
                        "can't decode this file",
                    );
                    return page;
                }
            }
        } else {
            blob.content.into_bytes()
        };

        if let Some(mime) = extension.as_deref().filter(|_| is_base64).and_then(image_mime) {
            info!(file = file_name, mime = %mime, "image file");
            page.doc.push(
                MAIN,
                Block::Image {
                    mime,
                    size: bytes.len(),
                },
            );
            return page;
        }

        let text = String::from_utf8_lossy(&bytes).into_owned();
        page.doc.push(
            MAIN,
            Block::Row(vec![
                Block::item(Icon::File, file_name),
                Block::Copy(CopyButton::new("copy", text.clone(), session.copy_reset())),
            ]),
        );
        page.doc.push(
            MAIN,
            Block::Code(CodeView {
                language: detect_language(file_name, &text),
                content: text,
            }),
        );

        page
    }
}

// Lowercased text after the last '.' of the file name, if any
fn file_extension(path: &str) -> Option<String> {
    let name = path.rsplit('/').next().unwrap_or(path);
    let (_, ext) = name.rsplit_once('.')?;
    Some(ext.to_lowercase())
}

fn video_download(contents: &Contents) -> Option<String> {
    if contents.kind != "file" {
        return None;
    }
    contents.download_url.clone().filter(|u| !u.is_empty())
}

fn image_mime(ext: &str) -> Option<String> {
    if let Some((_, mime)) = IMAGE_MIME_OVERRIDES.iter().find(|(e, _)| *e == ext) {
        return Some(mime.to_string());
    }
    PLAIN_IMAGE_EXTENSIONS
        .contains(&ext)
        .then(|| format!("image/{}", ext))
}

// The API wraps base64 content at 60 columns
fn decode_base64(content: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD.decode(compact)
}

#[async_trait::async_trait]
impl Page for BlobPage {
    fn document(&self) -> &Document {
        &self.doc
    }
}
