use autoriza_shared::authorization::{
    handle::{
        PreregisterDescriptor, PresenceUpdate, SelfRegisterDescriptor, StatusDescriptor,
        SubmissionDescriptor,
    },
    Authorization, Presence,
};
use chrono::NaiveDate;
use reqwest::{multipart::Form, Method, RequestBuilder, Response};

use crate::{Attachment, Error};

/// Every authorization of an event, for staff.
pub struct List {
    pub event_id: u64,
}

#[async_trait::async_trait]
impl super::Request for List {
    type Output = Vec<Authorization>;

    fn url_suffix(&self) -> String {
        format!("/autorizacoes/eventos/{}/autorizacoes", self.event_id)
    }

    async fn parse_res(&mut self, response: Response) -> Result<Self::Output, Error> {
        super::json(response).await
    }
}

/// Pre-registered students of an event, public.
pub struct ListPreregistered {
    pub event_id: u64,
}

#[async_trait::async_trait]
impl super::Request for ListPreregistered {
    type Output = Vec<Authorization>;

    fn url_suffix(&self) -> String {
        format!("/autorizacoes/eventos/{}/pre-cadastrados", self.event_id)
    }

    async fn parse_res(&mut self, response: Response) -> Result<Self::Output, Error> {
        super::json(response).await
    }
}

pub struct Preregister {
    pub event_id: u64,
    pub descriptor: PreregisterDescriptor,
}

#[async_trait::async_trait]
impl super::Request for Preregister {
    type Output = Authorization;
    const METHOD: Method = Method::POST;

    fn url_suffix(&self) -> String {
        format!("/autorizacoes/eventos/{}/pre-cadastrar", self.event_id)
    }

    fn make_req(&self, req: RequestBuilder) -> Result<RequestBuilder, Error> {
        Ok(req.json(&self.descriptor))
    }

    async fn parse_res(&mut self, response: Response) -> Result<Self::Output, Error> {
        super::json(response).await
    }
}

pub struct SelfRegister {
    pub event_id: u64,
    pub descriptor: SelfRegisterDescriptor,
    pub file: Attachment,
}

#[async_trait::async_trait]
impl super::Request for SelfRegister {
    type Output = Authorization;
    const METHOD: Method = Method::POST;

    fn url_suffix(&self) -> String {
        format!("/autorizacoes/evento/{}/inscrever-se", self.event_id)
    }

    fn make_req(&self, req: RequestBuilder) -> Result<RequestBuilder, Error> {
        let form = self
            .descriptor
            .fields()
            .into_iter()
            .fold(Form::new(), |form, (name, value)| form.text(name, value))
            .part("arquivo", self.file.to_part()?);

        Ok(req.multipart(form))
    }

    async fn parse_res(&mut self, response: Response) -> Result<Self::Output, Error> {
        super::json(response).await
    }
}

/// Submits the signed document of a pre-registered authorization.
pub struct Submit {
    pub id: u64,
    pub descriptor: SubmissionDescriptor,
    pub file: Attachment,
}

#[async_trait::async_trait]
impl super::Request for Submit {
    type Output = Authorization;
    const METHOD: Method = Method::PUT;

    fn url_suffix(&self) -> String {
        format!("/autorizacoes/{}/submeter", self.id)
    }

    fn make_req(&self, req: RequestBuilder) -> Result<RequestBuilder, Error> {
        let form = self
            .descriptor
            .fields()
            .into_iter()
            .fold(Form::new(), |form, (name, value)| form.text(name, value))
            .part("arquivo", self.file.to_part()?);

        Ok(req.multipart(form))
    }

    async fn parse_res(&mut self, response: Response) -> Result<Self::Output, Error> {
        super::json(response).await
    }
}

pub struct SetStatus {
    pub id: u64,
    pub descriptor: StatusDescriptor,
}

#[async_trait::async_trait]
impl super::Request for SetStatus {
    type Output = Authorization;
    const METHOD: Method = Method::PATCH;

    fn url_suffix(&self) -> String {
        format!("/autorizacoes/{}/status", self.id)
    }

    fn make_req(&self, req: RequestBuilder) -> Result<RequestBuilder, Error> {
        Ok(req.json(&self.descriptor))
    }

    async fn parse_res(&mut self, response: Response) -> Result<Self::Output, Error> {
        super::json(response).await
    }
}

pub struct SetPresence {
    pub id: u64,
    pub date: NaiveDate,
    pub update: PresenceUpdate,
}

#[async_trait::async_trait]
impl super::Request for SetPresence {
    type Output = Presence;
    const METHOD: Method = Method::PATCH;

    fn url_suffix(&self) -> String {
        format!(
            "/autorizacoes/{}/presenca/{}",
            self.id,
            self.date.format("%Y-%m-%d")
        )
    }

    fn make_req(&self, req: RequestBuilder) -> Result<RequestBuilder, Error> {
        Ok(req.json(&self.update))
    }

    async fn parse_res(&mut self, response: Response) -> Result<Self::Output, Error> {
        super::json(response).await
    }
}

/// A downloaded attachment.
#[derive(Debug, Clone)]
pub struct Download {
    /// File name suggested by the server, if any.
    pub file_name: Option<String>,
    pub bytes: bytes::Bytes,
}

/// The signed document of an authorization; requires a session.
pub struct File {
    pub id: u64,
}

#[async_trait::async_trait]
impl super::Request for File {
    type Output = Download;

    fn url_suffix(&self) -> String {
        format!("/autorizacoes/{}/arquivo", self.id)
    }

    async fn parse_res(&mut self, response: Response) -> Result<Self::Output, Error> {
        let file_name = response
            .headers()
            .get(reqwest::header::CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .and_then(disposition_file_name);

        Ok(Download {
            file_name,
            bytes: response.bytes().await?,
        })
    }
}

/// Extracts `filename` from a `Content-Disposition` header value.
fn disposition_file_name(value: &str) -> Option<String> {
    value
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"').to_owned())
        .filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    #[test]
    fn disposition() {
        assert_eq!(
            super::disposition_file_name(r#"attachment; filename="ana.pdf""#),
            Some("ana.pdf".to_owned())
        );
        assert_eq!(super::disposition_file_name("inline"), None);
        assert_eq!(super::disposition_file_name("attachment; filename=\"\""), None);
    }
}
