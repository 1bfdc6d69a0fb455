use crate::config::RetrievalConfig;
use crate::domain::ports::ContextRetriever;
use crate::utils::error::{Result, RetrievalError, TriageError};
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use std::collections::{HashSet, VecDeque};
use std::time::Duration;

const NO_ABSTRACT: &str = "No abstract available for this article.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub pmid: String,
    pub title: String,
    pub abstract_text: String,
}

impl Article {
    pub fn document(&self) -> String {
        format!("Title: {}\n\nAbstract: {}", self.title, self.abstract_text)
    }
}

#[derive(Debug, Deserialize)]
struct EsearchResponse {
    esearchresult: EsearchResult,
}

#[derive(Debug, Deserialize)]
struct EsearchResult {
    #[serde(default)]
    idlist: Vec<String>,
}

/// 從 efetch XML 擷取文章欄位
#[derive(Debug, Clone)]
struct ArticleExtractor {
    article: Regex,
    pmid: Regex,
    title: Regex,
    abstract_text: Regex,
    tag: Regex,
}

impl ArticleExtractor {
    fn new() -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| TriageError::ConfigError {
                message: format!("invalid PubMed extraction pattern '{}': {}", pattern, e),
            })
        };

        Ok(Self {
            article: compile(r"(?s)<PubmedArticle>(.*?)</PubmedArticle>")?,
            pmid: compile(r"<PMID[^>]*>(\d+)</PMID>")?,
            title: compile(r"(?s)<ArticleTitle[^>]*>(.*?)</ArticleTitle>")?,
            abstract_text: compile(r"(?s)<AbstractText[^>]*>(.*?)</AbstractText>")?,
            tag: compile(r"<[^>]+>")?,
        })
    }

    fn parse(&self, xml: &str) -> Vec<Article> {
        self.article
            .captures_iter(xml)
            .filter_map(|caps| {
                let body = caps.get(1)?.as_str();
                let pmid = self.pmid.captures(body)?.get(1)?.as_str().to_string();
                let title = self
                    .title
                    .captures(body)
                    .and_then(|c| c.get(1))
                    .map(|m| self.clean(m.as_str()))
                    .unwrap_or_default();

                let parts: Vec<String> = self
                    .abstract_text
                    .captures_iter(body)
                    .filter_map(|c| c.get(1).map(|m| self.clean(m.as_str())))
                    .filter(|part| !part.is_empty())
                    .collect();
                let abstract_text = if parts.is_empty() {
                    NO_ABSTRACT.to_string()
                } else {
                    parts.join(" ")
                };

                Some(Article {
                    pmid,
                    title,
                    abstract_text,
                })
            })
            .collect()
    }

    /// 去除內嵌標籤並還原常見實體
    fn clean(&self, raw: &str) -> String {
        let stripped = self.tag.replace_all(raw, "");
        stripped
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&apos;", "'")
            .replace("&#39;", "'")
            .replace("&amp;", "&")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// 以 NCBI E-utilities 取得 PubMed 摘要作為提示詞背景
pub struct PubMedRetriever {
    client: Client,
    config: RetrievalConfig,
    extractor: ArticleExtractor,
}

impl PubMedRetriever {
    pub fn new(config: RetrievalConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("symptom-triage/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            config,
            extractor: ArticleExtractor::new()?,
        })
    }

    fn url(&self, utility: &str) -> String {
        format!("{}/{}", self.config.endpoint.trim_end_matches('/'), utility)
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_seconds)
    }

    async fn esearch(&self, term: &str) -> std::result::Result<Vec<String>, RetrievalError> {
        let retmax = self.config.max_results.to_string();
        tracing::debug!("📡 PubMed esearch: {}", term);

        let response = self
            .client
            .get(self.url("esearch.fcgi"))
            .query(&[
                ("db", "pubmed"),
                ("term", term),
                ("retmax", retmax.as_str()),
                ("retmode", "json"),
                ("email", self.config.contact_email.as_str()),
                ("tool", self.config.tool.as_str()),
            ])
            .timeout(self.timeout())
            .send()
            .await?
            .error_for_status()?;

        let body: EsearchResponse = response.json().await?;
        Ok(body.esearchresult.idlist)
    }

    /// 搜尋文章編號；沒有結果時改用前三個字以 OR 組合重試
    pub async fn search(&self, query: &str) -> std::result::Result<Vec<String>, RetrievalError> {
        let ids = self.esearch(query).await?;
        if !ids.is_empty() {
            tracing::debug!("📚 Found {} PubMed articles", ids.len());
            return Ok(ids);
        }

        let general_query = query
            .split_whitespace()
            .take(3)
            .collect::<Vec<_>>()
            .join(" OR ");
        tracing::info!(
            "📚 No PubMed articles for '{}', trying more general search: {}",
            query,
            general_query
        );

        if general_query.is_empty() {
            return Err(RetrievalError::NoResults {
                query: query.to_string(),
            });
        }

        let ids = self.esearch(&general_query).await?;
        if ids.is_empty() {
            return Err(RetrievalError::NoResults {
                query: query.to_string(),
            });
        }
        Ok(ids)
    }

    pub async fn fetch_articles(
        &self,
        ids: &[String],
    ) -> std::result::Result<Vec<Article>, RetrievalError> {
        if ids.is_empty() {
            return Err(RetrievalError::InvalidResponse {
                message: "no PubMed IDs provided to fetch".to_string(),
            });
        }

        let id_list = ids.join(",");
        let response = self
            .client
            .get(self.url("efetch.fcgi"))
            .query(&[
                ("db", "pubmed"),
                ("id", id_list.as_str()),
                ("rettype", "abstract"),
                ("retmode", "xml"),
                ("email", self.config.contact_email.as_str()),
                ("tool", self.config.tool.as_str()),
            ])
            .timeout(self.timeout())
            .send()
            .await?
            .error_for_status()?;

        let xml = response.text().await?;
        let articles = self.extractor.parse(&xml);
        if articles.is_empty() {
            return Err(RetrievalError::EmptyArticles);
        }

        tracing::debug!("📚 Fetched {} PubMed articles", articles.len());
        Ok(articles)
    }
}

#[async_trait]
impl ContextRetriever for PubMedRetriever {
    async fn retrieve(&self, symptoms: &str) -> std::result::Result<String, RetrievalError> {
        if symptoms.trim().chars().count() < 3 {
            return Err(RetrievalError::InputTooShort);
        }

        let query = clean_symptoms(symptoms);
        let ids = self.search(&query).await?;
        let articles = self.fetch_articles(&ids).await?;

        let chunks: Vec<String> = articles
            .iter()
            .flat_map(|article| {
                chunk_text(
                    &article.document(),
                    self.config.chunk_size,
                    self.config.chunk_overlap,
                )
            })
            .collect();

        let top = rank_chunks(&query, chunks, self.config.top_k);
        Ok(format_context(&top))
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// 換行與連字號改為空白
pub fn clean_symptoms(symptoms: &str) -> String {
    symptoms.replace('\n', " ").replace('-', " ").trim().to_string()
}

/// 切塊時依序嘗試的分隔符號，空字串代表逐字元切割
const CHUNK_SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// 依段落、行、字詞的順序遞迴切塊，每塊不超過 `chunk_size` 個字元，
/// 相鄰區塊重疊最多 `chunk_overlap` 個字元
pub fn chunk_text(text: &str, chunk_size: usize, chunk_overlap: usize) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    if chunk_size == 0 {
        return vec![text.trim().to_string()];
    }

    split_recursive(text, &CHUNK_SEPARATORS, chunk_size, chunk_overlap)
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn split_recursive(
    text: &str,
    separators: &[&str],
    chunk_size: usize,
    chunk_overlap: usize,
) -> Vec<String> {
    let position = separators
        .iter()
        .position(|sep| sep.is_empty() || text.contains(sep))
        .unwrap_or(separators.len() - 1);
    let separator = separators[position];
    let finer = &separators[position + 1..];

    let pieces: Vec<&str> = if separator.is_empty() {
        text.char_indices()
            .map(|(i, c)| &text[i..i + c.len_utf8()])
            .collect()
    } else {
        text.split(separator).filter(|p| !p.is_empty()).collect()
    };

    let mut chunks = Vec::new();
    let mut pending: Vec<&str> = Vec::new();
    for piece in pieces {
        if char_len(piece) < chunk_size {
            pending.push(piece);
            continue;
        }

        if !pending.is_empty() {
            chunks.extend(merge_pieces(&pending, separator, chunk_size, chunk_overlap));
            pending.clear();
        }
        if finer.is_empty() {
            chunks.push(piece.to_string());
        } else {
            chunks.extend(split_recursive(piece, finer, chunk_size, chunk_overlap));
        }
    }
    if !pending.is_empty() {
        chunks.extend(merge_pieces(&pending, separator, chunk_size, chunk_overlap));
    }
    chunks
}

/// 將小片段以分隔符號接回，超過大小時輸出一塊並保留尾端作為重疊
fn merge_pieces(
    pieces: &[&str],
    separator: &str,
    chunk_size: usize,
    chunk_overlap: usize,
) -> Vec<String> {
    let separator_len = char_len(separator);
    let mut chunks = Vec::new();
    let mut window: VecDeque<&str> = VecDeque::new();
    let mut total = 0;

    for &piece in pieces {
        let len = char_len(piece);
        let joiner = if window.is_empty() { 0 } else { separator_len };

        if total + len + joiner > chunk_size && !window.is_empty() {
            push_chunk(&mut chunks, &window, separator);

            while total > chunk_overlap
                || (total > 0
                    && total + len + if window.is_empty() { 0 } else { separator_len }
                        > chunk_size)
            {
                let Some(first) = window.pop_front() else {
                    break;
                };
                total -= char_len(first) + if window.is_empty() { 0 } else { separator_len };
            }
        }

        total += len + if window.is_empty() { 0 } else { separator_len };
        window.push_back(piece);
    }

    push_chunk(&mut chunks, &window, separator);
    chunks
}

fn push_chunk(chunks: &mut Vec<String>, window: &VecDeque<&str>, separator: &str) {
    let joined = window.iter().copied().collect::<Vec<_>>().join(separator);
    let trimmed = joined.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

fn terms(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| word.chars().count() >= 3)
        .map(str::to_lowercase)
        .collect()
}

/// 以查詢字詞重疊數排序，同分保持原順序
pub fn rank_chunks(query: &str, chunks: Vec<String>, top_k: usize) -> Vec<String> {
    let query_terms = terms(query);

    let mut scored: Vec<(usize, String)> = chunks
        .into_iter()
        .map(|chunk| {
            let chunk_terms = terms(&chunk);
            let score = query_terms.intersection(&chunk_terms).count();
            (score, chunk)
        })
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored
        .into_iter()
        .take(top_k)
        .map(|(_, chunk)| chunk)
        .collect()
}

pub fn format_context(chunks: &[String]) -> String {
    let mut context = String::from("Relevant medical information:\n\n");
    for (i, chunk) in chunks.iter().enumerate() {
        context.push_str(&format!("Source {}:\n{}\n\n", i + 1, chunk));
    }
    context
}
